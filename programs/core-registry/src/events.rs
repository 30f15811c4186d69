use anchor_lang::prelude::*;

use crate::plugins::ExternalAdapterKey;

#[event]
pub struct RegistryResized {
    pub account: Pubkey,
    pub old_len: u64,
    pub new_len: u64,
}

#[event]
pub struct AssetTransferred {
    pub asset: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
}

#[event]
pub struct AssetBurned {
    pub asset: Pubkey,
    pub collection: Option<Pubkey>,
}

#[event]
pub struct AdapterDataWritten {
    pub account: Pubkey,
    pub key: ExternalAdapterKey,
    pub data_len: u64,
}
