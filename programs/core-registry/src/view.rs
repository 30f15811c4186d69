use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::plugins::{ExternalAdapterKey, PluginRecord, PluginType};
use crate::registry::ExternalAdapterRecord;
use crate::resolver::{effective_update_authority, linked_collection};
use crate::state::{AssetAccount, CollectionAccount, UpdateAuthority};

/// Which account a derived record was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordSource {
    Asset,
    Collection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedPlugin {
    pub source: RecordSource,
    pub record: PluginRecord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedAdapter {
    pub source: RecordSource,
    pub record: ExternalAdapterRecord,
}

/// Effective plugin state of an asset, merged from the asset and its
/// collection on read. Neither account is modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedAssetView {
    /// The link as stored on the asset.
    pub update_authority: UpdateAuthority,
    /// Keys holding the effective update authority after collection indirection.
    pub effective_update_authority: Vec<Pubkey>,
    /// Asset entry first. Only permanent kinds can carry two entries.
    pub plugins: BTreeMap<PluginType, Vec<DerivedPlugin>>,
    pub adapters: BTreeMap<ExternalAdapterKey, DerivedAdapter>,
}

impl DerivedAssetView {
    pub fn derive(asset: &AssetAccount, collection: Option<&CollectionAccount>) -> Result<Self> {
        let base = asset.base();
        let collection = linked_collection(base, collection)?;
        let effective_update_authority = effective_update_authority(base, collection)?;

        let mut plugins: BTreeMap<PluginType, Vec<DerivedPlugin>> = BTreeMap::new();
        for record in asset.plugins().plugins() {
            plugins.entry(record.plugin_type()).or_default().push(DerivedPlugin {
                source: RecordSource::Asset,
                record: record.clone(),
            });
        }

        let mut adapters = BTreeMap::new();
        for record in asset.plugins().adapter_records()? {
            adapters.insert(
                record.key,
                DerivedAdapter {
                    source: RecordSource::Asset,
                    record,
                },
            );
        }

        if let Some(collection) = collection {
            for record in collection.plugins().plugins() {
                let kind = record.plugin_type();
                if !kind.is_inherited() {
                    continue;
                }
                let entries = plugins.entry(kind).or_default();
                // Asset wins on collision, except permanent kinds which stack.
                if entries.is_empty() || kind.is_permanent() {
                    entries.push(DerivedPlugin {
                        source: RecordSource::Collection,
                        record: record.clone(),
                    });
                }
            }

            for record in collection.plugins().adapter_records()? {
                adapters.entry(record.key).or_insert(DerivedAdapter {
                    source: RecordSource::Collection,
                    record,
                });
            }
        }

        Ok(Self {
            update_authority: base.update_authority,
            effective_update_authority,
            plugins,
            adapters,
        })
    }

    /// The entry that governs `kind` for this asset: the asset's own record
    /// if present, otherwise the inherited one.
    pub fn plugin(&self, kind: PluginType) -> Option<&DerivedPlugin> {
        self.plugins.get(&kind).and_then(|entries| entries.first())
    }

    /// Every visible entry of `kind`.
    pub fn plugins_of(&self, kind: PluginType) -> &[DerivedPlugin] {
        self.plugins
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn adapter(&self, key: &ExternalAdapterKey) -> Option<&DerivedAdapter> {
        self.adapters.get(key)
    }

    /// Frozen by the owner's freeze delegate or by the governing permanent
    /// freeze (an asset-level one overrides the collection's).
    pub fn is_frozen(&self) -> bool {
        let governs = |kind| {
            self.plugin(kind)
                .map_or(false, |entry| entry.record.plugin.is_frozen())
        };
        governs(PluginType::FreezeDelegate) || governs(PluginType::PermanentFreezeDelegate)
    }

    pub fn has_immutable_metadata(&self) -> bool {
        self.plugin(PluginType::ImmutableMetadata).is_some()
    }
}
