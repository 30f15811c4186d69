use anchor_lang::prelude::*;

use crate::state::{CoreEntity, Key, UpdateAuthority};

/// Base record of an asset account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Always `Key::Asset`
    pub key: Key,
    /// Current owner
    pub owner: Pubkey,
    /// Plain key, collection link, or nobody
    pub update_authority: UpdateAuthority,
    pub name: String,
    pub uri: String,
    /// Compression sequence number, `None` for uncompressed assets
    pub seq: Option<u64>,
}

impl Asset {
    pub fn new(
        owner: Pubkey,
        update_authority: UpdateAuthority,
        name: String,
        uri: String,
    ) -> Self {
        Self {
            key: Key::Asset,
            owner,
            update_authority,
            name,
            uri,
            seq: None,
        }
    }
}

impl CoreEntity for Asset {
    const KEY: Key = Key::Asset;

    fn key(&self) -> Key {
        self.key
    }
}
