use anchor_lang::prelude::*;

use crate::errors::RegistryError;

/// Leading tag byte of every account and registry structure.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Uninitialized,
    Asset,
    PluginHeader,
    PluginRegistry,
    Collection,
}

impl Key {
    /// Read the tag of a raw account without decoding the rest.
    pub fn peek(data: &[u8]) -> Result<Key> {
        match data.first() {
            Some(0) => Ok(Key::Uninitialized),
            Some(1) => Ok(Key::Asset),
            Some(2) => Ok(Key::PluginHeader),
            Some(3) => Ok(Key::PluginRegistry),
            Some(4) => Ok(Key::Collection),
            _ => err!(RegistryError::DeserializationError),
        }
    }
}
