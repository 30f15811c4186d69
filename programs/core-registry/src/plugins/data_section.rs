use anchor_lang::prelude::*;

use crate::errors::RegistryError;

/// Encoding declared for an adapter's payload when the adapter is created.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum DataSchema {
    Binary,
    Json,
    MsgPack,
}

/// A payload that passed validation for its schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedData {
    pub schema: DataSchema,
    pub bytes: Vec<u8>,
    /// Byte count for binary, top-level element count for structured data.
    pub logical_len: u64,
}

impl EncodedData {
    /// Bytes the payload occupies in the account.
    pub fn storage_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Structured view of a stored payload.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedData<'a> {
    Empty,
    Binary(&'a [u8]),
    Json(serde_json::Value),
    MsgPack(rmpv::Value),
}

pub struct DataSectionCodec;

impl DataSectionCodec {
    /// Validate `bytes` against `schema`. An empty payload clears the
    /// section and is valid under every schema.
    pub fn encode(schema: DataSchema, bytes: Vec<u8>) -> Result<EncodedData> {
        let logical_len = match Self::decode(schema, &bytes)? {
            DecodedData::Empty => 0,
            DecodedData::Binary(raw) => raw.len() as u64,
            DecodedData::Json(value) => match value {
                serde_json::Value::Array(items) => items.len() as u64,
                serde_json::Value::Object(entries) => entries.len() as u64,
                _ => 1,
            },
            DecodedData::MsgPack(value) => match value {
                rmpv::Value::Array(items) => items.len() as u64,
                rmpv::Value::Map(entries) => entries.len() as u64,
                _ => 1,
            },
        };

        Ok(EncodedData {
            schema,
            bytes,
            logical_len,
        })
    }

    pub fn decode(schema: DataSchema, bytes: &[u8]) -> Result<DecodedData<'_>> {
        if bytes.is_empty() {
            return Ok(DecodedData::Empty);
        }

        match schema {
            DataSchema::Binary => Ok(DecodedData::Binary(bytes)),
            DataSchema::Json => serde_json::from_slice::<serde_json::Value>(bytes)
                .map(DecodedData::Json)
                .map_err(|_| error!(RegistryError::DataTypeMismatch)),
            DataSchema::MsgPack => {
                let mut reader = bytes;
                let value = rmpv::decode::read_value(&mut reader)
                    .map_err(|_| error!(RegistryError::DataTypeMismatch))?;
                // A single document, nothing trailing.
                require!(reader.is_empty(), RegistryError::DataTypeMismatch);
                Ok(DecodedData::MsgPack(value))
            }
        }
    }
}
