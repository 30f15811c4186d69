use anchor_lang::prelude::*;

use crate::plugins::{ExternalPluginAdapterType, LifecycleCheckTable, PluginType};
use crate::state::{Authority, Key};

/// Sits right after the base record and points at the trailing registry.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PluginHeader {
    pub key: Key,
    pub plugin_registry_offset: u64,
}

impl PluginHeader {
    pub const LEN: u64 = 1 + 8;
}

/// Index entry of an internal plugin.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryRecord {
    pub plugin_type: PluginType,
    pub authority: Authority,
    pub offset: u64,
}

/// Index entry of an external adapter. `data_offset`/`data_len` are only
/// present for adapters that carry a payload.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExternalRegistryRecord {
    pub plugin_type: ExternalPluginAdapterType,
    pub authority: Authority,
    pub lifecycle_checks: Option<LifecycleCheckTable>,
    pub offset: u64,
    pub data_offset: Option<u64>,
    pub data_len: Option<u64>,
}

/// Trailing index of every record in the account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PluginRegistry {
    pub key: Key,
    pub registry: Vec<RegistryRecord>,
    pub external_registry: Vec<ExternalRegistryRecord>,
}
