use anchor_lang::prelude::*;

use crate::plugins::{
    DataSchema, ExternalCheckResult, LifecycleCheckTable, LifecycleEvent, Oracle,
    ValidationResultsOffset,
};
use crate::state::Authority;

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum ExternalPluginAdapterType {
    LifecycleHook,
    Oracle,
    AppData,
    LinkedAppData,
    DataSection,
}

/// Parent of an asset-side data section.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum LinkedDataKey {
    LinkedAppData(Authority),
}

impl LinkedDataKey {
    pub fn data_authority(&self) -> Authority {
        match self {
            LinkedDataKey::LinkedAppData(authority) => *authority,
        }
    }

    /// Key of the collection adapter this section belongs to.
    pub fn parent(&self) -> ExternalAdapterKey {
        match self {
            LinkedDataKey::LinkedAppData(authority) => {
                ExternalAdapterKey::LinkedAppData(*authority)
            }
        }
    }
}

/// Kind plus discriminant; two adapters of one kind differ by this key.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum ExternalAdapterKey {
    LifecycleHook(Pubkey),
    Oracle(Pubkey),
    AppData(Authority),
    LinkedAppData(Authority),
    DataSection(LinkedDataKey),
}

impl ExternalAdapterKey {
    pub fn adapter_type(&self) -> ExternalPluginAdapterType {
        match self {
            ExternalAdapterKey::LifecycleHook(_) => ExternalPluginAdapterType::LifecycleHook,
            ExternalAdapterKey::Oracle(_) => ExternalPluginAdapterType::Oracle,
            ExternalAdapterKey::AppData(_) => ExternalPluginAdapterType::AppData,
            ExternalAdapterKey::LinkedAppData(_) => ExternalPluginAdapterType::LinkedAppData,
            ExternalAdapterKey::DataSection(_) => ExternalPluginAdapterType::DataSection,
        }
    }

    /// The data section key a linked adapter's payload is stored under.
    pub fn linked_data_key(&self) -> Option<LinkedDataKey> {
        match self {
            ExternalAdapterKey::LinkedAppData(authority) => {
                Some(LinkedDataKey::LinkedAppData(*authority))
            }
            _ => None,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleHook {
    pub hooked_program: Pubkey,
    /// Writers of the hook's data section, `None` when the hook keeps no data.
    pub data_authority: Option<Authority>,
    pub schema: DataSchema,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppData {
    pub data_authority: Authority,
    pub schema: DataSchema,
}

/// Collection adapter whose data lives on each member asset.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkedAppData {
    pub data_authority: Authority,
    pub schema: DataSchema,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataSection {
    pub parent_key: LinkedDataKey,
    pub schema: DataSchema,
}

/// External plugin adapter header as stored at the record offset.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalPluginAdapter {
    LifecycleHook(LifecycleHook),
    Oracle(Oracle),
    AppData(AppData),
    LinkedAppData(LinkedAppData),
    DataSection(DataSection),
}

impl ExternalPluginAdapter {
    pub fn adapter_type(&self) -> ExternalPluginAdapterType {
        self.key().adapter_type()
    }

    pub fn key(&self) -> ExternalAdapterKey {
        match self {
            ExternalPluginAdapter::LifecycleHook(hook) => {
                ExternalAdapterKey::LifecycleHook(hook.hooked_program)
            }
            ExternalPluginAdapter::Oracle(oracle) => {
                ExternalAdapterKey::Oracle(oracle.base_address)
            }
            ExternalPluginAdapter::AppData(app_data) => {
                ExternalAdapterKey::AppData(app_data.data_authority)
            }
            ExternalPluginAdapter::LinkedAppData(linked) => {
                ExternalAdapterKey::LinkedAppData(linked.data_authority)
            }
            ExternalPluginAdapter::DataSection(section) => {
                ExternalAdapterKey::DataSection(section.parent_key)
            }
        }
    }

    /// Secondary authority that may write the adapter's data.
    pub fn data_authority(&self) -> Option<Authority> {
        match self {
            ExternalPluginAdapter::LifecycleHook(hook) => hook.data_authority,
            ExternalPluginAdapter::Oracle(_) => None,
            ExternalPluginAdapter::AppData(app_data) => Some(app_data.data_authority),
            ExternalPluginAdapter::LinkedAppData(linked) => Some(linked.data_authority),
            ExternalPluginAdapter::DataSection(section) => {
                Some(section.parent_key.data_authority())
            }
        }
    }

    pub fn schema(&self) -> Option<DataSchema> {
        match self {
            ExternalPluginAdapter::LifecycleHook(hook) => Some(hook.schema),
            ExternalPluginAdapter::Oracle(_) => None,
            ExternalPluginAdapter::AppData(app_data) => Some(app_data.schema),
            ExternalPluginAdapter::LinkedAppData(linked) => Some(linked.schema),
            ExternalPluginAdapter::DataSection(section) => Some(section.schema),
        }
    }

    /// Whether a payload is stored right after this adapter's header.
    /// Linked app data keeps its payload in per-asset data sections instead.
    pub fn carries_data(&self) -> bool {
        match self {
            ExternalPluginAdapter::LifecycleHook(hook) => hook.data_authority.is_some(),
            ExternalPluginAdapter::Oracle(_) | ExternalPluginAdapter::LinkedAppData(_) => false,
            ExternalPluginAdapter::AppData(_) | ExternalPluginAdapter::DataSection(_) => true,
        }
    }

    pub fn default_authority(&self) -> Authority {
        Authority::UpdateAuthority
    }
}

/// Arguments to add an adapter.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExternalAdapterInitInfo {
    pub adapter: ExternalPluginAdapter,
    /// Management authority, defaults to `UpdateAuthority`.
    pub init_authority: Option<Authority>,
    pub lifecycle_checks: Option<Vec<(LifecycleEvent, ExternalCheckResult)>>,
    pub initial_data: Option<Vec<u8>>,
}

impl ExternalAdapterInitInfo {
    pub fn new(adapter: ExternalPluginAdapter) -> Self {
        Self {
            adapter,
            init_authority: None,
            lifecycle_checks: None,
            initial_data: None,
        }
    }

    pub fn lifecycle_table(&self) -> Option<LifecycleCheckTable> {
        self.lifecycle_checks
            .as_ref()
            .map(|entries| LifecycleCheckTable::new(entries.iter().copied()))
    }
}

/// Arguments to update an adapter. The schema and key are fixed at creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalAdapterUpdateInfo {
    pub lifecycle_checks: Option<Vec<(LifecycleEvent, ExternalCheckResult)>>,
    pub results_offset: Option<ValidationResultsOffset>,
}
