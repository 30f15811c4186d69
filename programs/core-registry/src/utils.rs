use anchor_lang::prelude::*;

use crate::errors::RegistryError;

/// Borsh-encoded length of `value`.
pub fn encoded_len<T: AnchorSerialize>(value: &T) -> Result<u64> {
    value
        .try_to_vec()
        .map(|bytes| bytes.len() as u64)
        .map_err(|_| error!(RegistryError::SerializationError))
}

/// Decode a `T` from the front of `bytes`, returning it with the number of
/// bytes consumed.
pub fn decode_prefix<T: AnchorDeserialize>(bytes: &[u8]) -> Result<(T, u64)> {
    let mut cursor = bytes;
    let value =
        T::deserialize(&mut cursor).map_err(|_| error!(RegistryError::DeserializationError))?;
    Ok((value, (bytes.len() - cursor.len()) as u64))
}

pub fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| error!(RegistryError::NumericalOverflow))
}

/// `bytes[offset..]`, or a decode error when out of range.
pub fn tail(bytes: &[u8], offset: u64) -> Result<&[u8]> {
    bytes
        .get(to_usize(offset)?..)
        .ok_or_else(|| error!(RegistryError::DeserializationError))
}

pub fn write<T: AnchorSerialize>(value: &T, out: &mut Vec<u8>) -> Result<()> {
    value
        .serialize(out)
        .map_err(|_| error!(RegistryError::SerializationError))
}
