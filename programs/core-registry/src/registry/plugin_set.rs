use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{
    DataSchema, ExternalAdapterKey, ExternalPluginAdapter, LifecycleCheckTable, Plugin,
    PluginRecord, PluginType,
};
use crate::registry::{
    ExternalRegistryRecord, Placement, PluginHeader, PluginRegistry, RecordId, RegistryLayout,
    RegistryRecord, Slot,
};
use crate::state::{Authority, Key};
use crate::utils::{decode_prefix, encoded_len, tail, to_usize, write};

/// Stored state of one external adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterEntry {
    pub adapter: ExternalPluginAdapter,
    pub authority: Authority,
    pub lifecycle_checks: Option<LifecycleCheckTable>,
    /// `Some` exactly when the adapter carries data.
    pub data: Option<Vec<u8>>,
}

/// An adapter together with its current position in the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalAdapterRecord {
    pub key: ExternalAdapterKey,
    pub adapter: ExternalPluginAdapter,
    pub authority: Authority,
    pub data_authority: Option<Authority>,
    pub schema: Option<DataSchema>,
    pub lifecycle_checks: Option<LifecycleCheckTable>,
    pub offset: u64,
    pub data_offset: Option<u64>,
    pub data_len: Option<u64>,
}

/// Every plugin and adapter of one account plus their packed layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginSet {
    layout: RegistryLayout,
    plugins: BTreeMap<PluginType, PluginRecord>,
    adapters: BTreeMap<ExternalAdapterKey, AdapterEntry>,
}

impl PluginSet {
    pub fn new(start: u64) -> Self {
        Self {
            layout: RegistryLayout::new(start),
            plugins: BTreeMap::new(),
            adapters: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &RegistryLayout {
        &self.layout
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn plugin(&self, kind: PluginType) -> Option<&PluginRecord> {
        self.plugins.get(&kind)
    }

    pub fn plugins(&self) -> impl Iterator<Item = &PluginRecord> {
        self.plugins.values()
    }

    pub fn adapter(&self, key: &ExternalAdapterKey) -> Option<&AdapterEntry> {
        self.adapters.get(key)
    }

    pub fn adapter_record(&self, key: &ExternalAdapterKey) -> Result<ExternalAdapterRecord> {
        let entry = self
            .adapters
            .get(key)
            .ok_or(RegistryError::PluginNotFound)?;
        let placement = self.layout.placement(&RecordId::Adapter(*key))?;
        Ok(Self::record_view(*key, entry, &placement))
    }

    pub fn adapter_records(&self) -> Result<Vec<ExternalAdapterRecord>> {
        self.adapters
            .keys()
            .map(|key| self.adapter_record(key))
            .collect()
    }

    fn record_view(
        key: ExternalAdapterKey,
        entry: &AdapterEntry,
        placement: &Placement,
    ) -> ExternalAdapterRecord {
        let carries_data = entry.data.is_some();
        ExternalAdapterRecord {
            key,
            adapter: entry.adapter,
            authority: entry.authority,
            data_authority: entry.adapter.data_authority(),
            schema: entry.adapter.schema(),
            lifecycle_checks: entry.lifecycle_checks.clone(),
            offset: placement.offset,
            data_offset: carries_data.then_some(placement.data_offset),
            data_len: carries_data.then_some(placement.data_len),
        }
    }

    pub fn add_plugin(&mut self, record: PluginRecord) -> Result<u64> {
        let kind = record.plugin_type();
        require!(!self.plugins.contains_key(&kind), RegistryError::DuplicateRecord);

        let header_len = encoded_len(&record.plugin)?;
        let grown = self
            .layout
            .push(Slot::new(RecordId::Plugin(kind), header_len, 0))?;
        self.plugins.insert(kind, record);
        Ok(grown)
    }

    pub fn remove_plugin(&mut self, kind: PluginType) -> Result<PluginRecord> {
        self.layout.remove(&[RecordId::Plugin(kind)])?;
        self.plugins
            .remove(&kind)
            .ok_or_else(|| error!(RegistryError::LayoutInvariant))
    }

    /// Swap a plugin's data, re-threading its successors if the size changed.
    pub fn replace_plugin(&mut self, plugin: Plugin) -> Result<i64> {
        let kind = plugin.plugin_type();
        let record = self
            .plugins
            .get_mut(&kind)
            .ok_or(RegistryError::PluginNotFound)?;
        let delta = self
            .layout
            .resize_header(&RecordId::Plugin(kind), encoded_len(&plugin)?)?;
        record.plugin = plugin;
        Ok(delta)
    }

    /// Authorities live in the trailing registry, so no record moves.
    pub fn set_plugin_authority(&mut self, kind: PluginType, authority: Authority) -> Result<()> {
        self.plugins
            .get_mut(&kind)
            .ok_or(RegistryError::PluginNotFound)?
            .authority = authority;
        Ok(())
    }

    pub fn add_adapter(&mut self, entry: AdapterEntry) -> Result<u64> {
        let key = entry.adapter.key();
        require!(!self.adapters.contains_key(&key), RegistryError::DuplicateRecord);
        require!(
            entry.data.is_some() == entry.adapter.carries_data(),
            RegistryError::NoDataSection
        );

        let header_len = encoded_len(&entry.adapter)?;
        let data_len = entry.data.as_ref().map_or(0, |data| data.len() as u64);
        let grown = self
            .layout
            .push(Slot::new(RecordId::Adapter(key), header_len, data_len))?;
        self.adapters.insert(key, entry);
        Ok(grown)
    }

    /// Remove an adapter together with any data section linked to it, as one
    /// shift of the records behind them.
    pub fn remove_adapter(&mut self, key: &ExternalAdapterKey) -> Result<AdapterEntry> {
        let mut ids = vec![RecordId::Adapter(*key)];
        let child = key
            .linked_data_key()
            .map(ExternalAdapterKey::DataSection)
            .filter(|child| self.adapters.contains_key(child));
        if let Some(child) = child {
            ids.push(RecordId::Adapter(child));
        }

        self.layout.remove(&ids)?;
        if let Some(child) = child {
            self.adapters.remove(&child);
        }
        self.adapters
            .remove(key)
            .ok_or_else(|| error!(RegistryError::LayoutInvariant))
    }

    /// Swap an adapter's header for one with the same key.
    pub fn replace_adapter(&mut self, adapter: ExternalPluginAdapter) -> Result<i64> {
        let key = adapter.key();
        let entry = self
            .adapters
            .get_mut(&key)
            .ok_or(RegistryError::PluginNotFound)?;
        require!(
            adapter.carries_data() == entry.adapter.carries_data(),
            RegistryError::NoDataSection
        );
        let delta = self
            .layout
            .resize_header(&RecordId::Adapter(key), encoded_len(&adapter)?)?;
        entry.adapter = adapter;
        Ok(delta)
    }

    pub fn set_lifecycle_checks(
        &mut self,
        key: &ExternalAdapterKey,
        checks: Option<LifecycleCheckTable>,
    ) -> Result<()> {
        self.adapters
            .get_mut(key)
            .ok_or(RegistryError::PluginNotFound)?
            .lifecycle_checks = checks;
        Ok(())
    }

    /// Replace an adapter's payload. The adapter's own offsets are unchanged;
    /// every later record moves by the returned delta.
    pub fn write_data(&mut self, key: &ExternalAdapterKey, data: Vec<u8>) -> Result<i64> {
        let entry = self
            .adapters
            .get_mut(key)
            .ok_or(RegistryError::PluginNotFound)?;
        require!(entry.data.is_some(), RegistryError::NoDataSection);

        let delta = self
            .layout
            .resize(&RecordId::Adapter(*key), data.len() as u64)?;
        entry.data = Some(data);
        Ok(delta)
    }

    pub fn rebase(&mut self, start: u64) -> Result<()> {
        self.layout.rebase(start)
    }

    fn registry(&self) -> Result<PluginRegistry> {
        let placements: BTreeMap<RecordId, Placement> = self
            .layout
            .placements()?
            .into_iter()
            .map(|placement| (placement.id, placement))
            .collect();
        let placement = |id: RecordId| {
            placements
                .get(&id)
                .copied()
                .ok_or_else(|| error!(RegistryError::LayoutInvariant))
        };

        let mut registry = Vec::with_capacity(self.plugins.len());
        for (kind, record) in &self.plugins {
            registry.push(RegistryRecord {
                plugin_type: *kind,
                authority: record.authority,
                offset: placement(RecordId::Plugin(*kind))?.offset,
            });
        }

        let mut external_registry = Vec::with_capacity(self.adapters.len());
        for (key, entry) in &self.adapters {
            let view = Self::record_view(*key, entry, &placement(RecordId::Adapter(*key))?);
            external_registry.push(ExternalRegistryRecord {
                plugin_type: key.adapter_type(),
                authority: view.authority,
                lifecycle_checks: view.lifecycle_checks,
                offset: view.offset,
                data_offset: view.data_offset,
                data_len: view.data_len,
            });
        }

        Ok(PluginRegistry {
            key: Key::PluginRegistry,
            registry,
            external_registry,
        })
    }

    /// Bytes this set adds after the base record.
    pub fn encoded_len(&self) -> Result<u64> {
        if self.is_empty() {
            return Ok(0);
        }
        let records = PluginHeader::LEN
            .checked_add(self.layout.size()?)
            .ok_or(RegistryError::NumericalOverflow)?;
        records
            .checked_add(encoded_len(&self.registry()?)?)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }

    /// Append header, records and registry to `out`, which must hold exactly
    /// the base record. An empty set writes nothing.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        require!(
            out.len() as u64 + PluginHeader::LEN == self.layout.start(),
            RegistryError::LayoutInvariant
        );

        let header = PluginHeader {
            key: Key::PluginHeader,
            plugin_registry_offset: self.layout.end()?,
        };
        write(&header, out)?;

        for placement in self.layout.placements()? {
            require!(
                out.len() as u64 == placement.offset,
                RegistryError::LayoutInvariant
            );
            match placement.id {
                RecordId::Plugin(kind) => {
                    let record = self
                        .plugins
                        .get(&kind)
                        .ok_or(RegistryError::LayoutInvariant)?;
                    write(&record.plugin, out)?;
                }
                RecordId::Adapter(key) => {
                    let entry = self
                        .adapters
                        .get(&key)
                        .ok_or(RegistryError::LayoutInvariant)?;
                    write(&entry.adapter, out)?;
                    require!(
                        out.len() as u64 == placement.data_offset,
                        RegistryError::LayoutInvariant
                    );
                    if let Some(data) = &entry.data {
                        out.extend_from_slice(data);
                    }
                }
            }
            require!(
                out.len() as u64 == placement.end()?,
                RegistryError::LayoutInvariant
            );
        }

        write(&self.registry()?, out)
    }

    /// Rebuild the set from an account whose base record is `base_len` bytes.
    pub fn decode(data: &[u8], base_len: u64) -> Result<Self> {
        let start = base_len
            .checked_add(PluginHeader::LEN)
            .ok_or(RegistryError::NumericalOverflow)?;
        let mut set = Self::new(start);
        if data.len() as u64 == base_len {
            return Ok(set);
        }

        let (header, _) = decode_prefix::<PluginHeader>(tail(data, base_len)?)?;
        require!(
            header.key == Key::PluginHeader,
            RegistryError::DeserializationError
        );

        let registry_bytes = tail(data, header.plugin_registry_offset)?;
        let (registry, registry_len) = decode_prefix::<PluginRegistry>(registry_bytes)?;
        require!(
            registry.key == Key::PluginRegistry,
            RegistryError::DeserializationError
        );
        require!(
            registry_len == registry_bytes.len() as u64,
            RegistryError::DeserializationError
        );

        let mut placements = Vec::new();
        for record in registry.registry {
            let (plugin, header_len) = decode_prefix::<Plugin>(tail(data, record.offset)?)?;
            require!(
                plugin.plugin_type() == record.plugin_type,
                RegistryError::DeserializationError
            );
            placements.push(Placement {
                id: RecordId::Plugin(record.plugin_type),
                offset: record.offset,
                data_offset: record
                    .offset
                    .checked_add(header_len)
                    .ok_or(RegistryError::NumericalOverflow)?,
                data_len: 0,
            });
            let previous = set.plugins.insert(
                record.plugin_type,
                PluginRecord {
                    authority: record.authority,
                    plugin,
                },
            );
            require!(previous.is_none(), RegistryError::LayoutInvariant);
        }

        for record in registry.external_registry {
            let (adapter, header_len) =
                decode_prefix::<ExternalPluginAdapter>(tail(data, record.offset)?)?;
            require!(
                adapter.adapter_type() == record.plugin_type,
                RegistryError::DeserializationError
            );
            let data_offset = record
                .offset
                .checked_add(header_len)
                .ok_or(RegistryError::NumericalOverflow)?;

            let payload = if adapter.carries_data() {
                require!(
                    record.data_offset == Some(data_offset),
                    RegistryError::LayoutInvariant
                );
                let data_len = record.data_len.ok_or(RegistryError::DeserializationError)?;
                let end = data_offset
                    .checked_add(data_len)
                    .ok_or(RegistryError::NumericalOverflow)?;
                let bytes = data
                    .get(to_usize(data_offset)?..to_usize(end)?)
                    .ok_or(RegistryError::DeserializationError)?;
                Some(bytes.to_vec())
            } else {
                require!(
                    record.data_offset.is_none() && record.data_len.is_none(),
                    RegistryError::DeserializationError
                );
                None
            };

            let key = adapter.key();
            placements.push(Placement {
                id: RecordId::Adapter(key),
                offset: record.offset,
                data_offset,
                data_len: payload.as_ref().map_or(0, |bytes| bytes.len() as u64),
            });
            let previous = set.adapters.insert(
                key,
                AdapterEntry {
                    adapter,
                    authority: record.authority,
                    lifecycle_checks: record.lifecycle_checks,
                    data: payload,
                },
            );
            require!(previous.is_none(), RegistryError::LayoutInvariant);
        }

        set.layout =
            RegistryLayout::from_placements(start, placements, header.plugin_registry_offset)?;
        Ok(set)
    }
}
