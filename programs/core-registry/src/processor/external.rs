use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{
    DataSection, DataSectionCodec, ExternalAdapterInitInfo, ExternalAdapterKey,
    ExternalAdapterUpdateInfo, ExternalPluginAdapter, LifecycleCheckTable, LinkedDataKey,
};
use crate::processor::Gate;
use crate::registry::{AdapterEntry, PluginSet};
use crate::resolver::linked_collection;
use crate::state::{AssetAccount, CollectionAccount};

pub(crate) fn add_adapter_to(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    info: ExternalAdapterInitInfo,
    creating: bool,
) -> Result<()> {
    let adapter = info.adapter;
    let adapter_type = adapter.adapter_type();
    require!(
        gate.allows_adapter(adapter_type),
        RegistryError::InvalidPluginTarget
    );
    require!(
        set.adapter(&adapter.key()).is_none(),
        RegistryError::DuplicateRecord
    );

    let checks = info.lifecycle_table();
    LifecycleCheckTable::validate_for(checks.as_ref(), adapter_type)?;
    if !creating {
        require!(
            gate.is_update_authority(authority)?,
            RegistryError::InvalidAuthority
        );
    }

    let data = if adapter.carries_data() {
        let schema = adapter.schema().ok_or(RegistryError::NoDataSection)?;
        let initial = info.initial_data.unwrap_or_default();
        Some(DataSectionCodec::encode(schema, initial)?.bytes)
    } else {
        require!(info.initial_data.is_none(), RegistryError::NoDataSection);
        None
    };

    set.add_adapter(AdapterEntry {
        adapter,
        authority: info
            .init_authority
            .unwrap_or_else(|| adapter.default_authority()),
        lifecycle_checks: checks.filter(|checks| !checks.is_empty()),
        data,
    })?;
    msg!("Added {:?} adapter", adapter_type);
    Ok(())
}

fn remove_adapter_from(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    key: &ExternalAdapterKey,
) -> Result<()> {
    let entry = set.adapter(key).ok_or(RegistryError::PluginNotFound)?;
    require!(!entry.authority.is_none(), RegistryError::ImmutableRecord);
    require!(
        gate.satisfies(authority, &entry.authority)? || gate.is_update_authority(authority)?,
        RegistryError::InvalidAuthority
    );

    set.remove_adapter(key)?;
    msg!("Removed {:?} adapter", key.adapter_type());
    Ok(())
}

fn update_adapter_in(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    key: &ExternalAdapterKey,
    info: ExternalAdapterUpdateInfo,
) -> Result<()> {
    let entry = set.adapter(key).ok_or(RegistryError::PluginNotFound)?;
    require!(!entry.authority.is_none(), RegistryError::ImmutableRecord);
    require!(
        gate.satisfies(authority, &entry.authority)?,
        RegistryError::InvalidAuthority
    );
    let adapter = entry.adapter;

    if let Some(entries) = info.lifecycle_checks {
        let checks = LifecycleCheckTable::new(entries);
        LifecycleCheckTable::validate_for(Some(&checks), key.adapter_type())?;
        set.set_lifecycle_checks(key, (!checks.is_empty()).then_some(checks))?;
    }

    if let Some(results_offset) = info.results_offset {
        let ExternalPluginAdapter::Oracle(mut oracle) = adapter else {
            return err!(RegistryError::InvalidPluginTarget);
        };
        oracle.results_offset = results_offset;
        set.replace_adapter(ExternalPluginAdapter::Oracle(oracle))?;
    }

    msg!("Updated {:?} adapter", key.adapter_type());
    Ok(())
}

/// Overwrite the payload of an adapter stored in `set`.
fn write_data_in(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    key: &ExternalAdapterKey,
    data: Vec<u8>,
) -> Result<()> {
    let entry = set.adapter(key).ok_or(RegistryError::PluginNotFound)?;
    require!(entry.data.is_some(), RegistryError::NoDataSection);
    let data_authority = entry
        .adapter
        .data_authority()
        .ok_or(RegistryError::NoDataSection)?;
    let schema = entry.adapter.schema().ok_or(RegistryError::NoDataSection)?;
    require!(
        gate.satisfies(authority, &data_authority)?,
        RegistryError::InvalidAuthority
    );

    let encoded = DataSectionCodec::encode(schema, data)?;
    let written = encoded.storage_len();
    let delta = set.write_data(key, encoded.bytes)?;
    msg!(
        "Wrote {} bytes to {:?} adapter ({} bytes moved)",
        written,
        key.adapter_type(),
        delta
    );
    Ok(())
}

/// Write an asset's payload for a linked adapter declared on its
/// collection, creating the asset's data section on first write.
fn write_linked_data(
    gate: &Gate,
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    next: &mut AssetAccount,
    parent_key: LinkedDataKey,
    data: Vec<u8>,
) -> Result<()> {
    let collection =
        linked_collection(asset.base(), collection)?.ok_or(RegistryError::MissingCollection)?;
    let parent = collection
        .plugins()
        .adapter(&parent_key.parent())
        .ok_or(RegistryError::PluginNotFound)?;
    let schema = parent.adapter.schema().ok_or(RegistryError::NoDataSection)?;
    require!(
        gate.satisfies(authority, &parent_key.data_authority())?,
        RegistryError::InvalidAuthority
    );

    let encoded = DataSectionCodec::encode(schema, data)?;
    let written = encoded.storage_len();
    let section_key = ExternalAdapterKey::DataSection(parent_key);
    if next.plugins().adapter(&section_key).is_some() {
        next.plugins_mut().write_data(&section_key, encoded.bytes)?;
    } else {
        next.plugins_mut().add_adapter(AdapterEntry {
            adapter: ExternalPluginAdapter::DataSection(DataSection { parent_key, schema }),
            authority: parent_key.data_authority(),
            lifecycle_checks: None,
            data: Some(encoded.bytes),
        })?;
    }
    msg!("Wrote {} bytes to linked data section", written);
    Ok(())
}

pub fn add_external_adapter(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    info: ExternalAdapterInitInfo,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    add_adapter_to(&gate, authority, next.plugins_mut(), info, false)?;
    Ok(next)
}

pub fn add_collection_external_adapter(
    authority: &Pubkey,
    collection: &CollectionAccount,
    info: ExternalAdapterInitInfo,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    add_adapter_to(&gate, authority, next.plugins_mut(), info, false)?;
    Ok(next)
}

/// Removing a data section's parent also removes the section, and an
/// asset's data section can be removed on its own.
pub fn remove_external_adapter(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    key: ExternalAdapterKey,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    remove_adapter_from(&gate, authority, next.plugins_mut(), &key)?;
    Ok(next)
}

pub fn remove_collection_external_adapter(
    authority: &Pubkey,
    collection: &CollectionAccount,
    key: ExternalAdapterKey,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    remove_adapter_from(&gate, authority, next.plugins_mut(), &key)?;
    Ok(next)
}

pub fn update_external_adapter(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    key: ExternalAdapterKey,
    info: ExternalAdapterUpdateInfo,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    update_adapter_in(&gate, authority, next.plugins_mut(), &key, info)?;
    Ok(next)
}

pub fn update_collection_external_adapter(
    authority: &Pubkey,
    collection: &CollectionAccount,
    key: ExternalAdapterKey,
    info: ExternalAdapterUpdateInfo,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    update_adapter_in(&gate, authority, next.plugins_mut(), &key, info)?;
    Ok(next)
}

/// Validate `data` against the adapter's schema and store it. Writes keyed
/// by a linked adapter (or its data section) land in the asset's own data
/// section.
pub fn write_external_adapter_data(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    key: ExternalAdapterKey,
    data: Vec<u8>,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    match key {
        ExternalAdapterKey::LinkedAppData(data_authority) => write_linked_data(
            &gate,
            authority,
            asset,
            collection,
            &mut next,
            LinkedDataKey::LinkedAppData(data_authority),
            data,
        )?,
        ExternalAdapterKey::DataSection(parent_key) => write_linked_data(
            &gate, authority, asset, collection, &mut next, parent_key, data,
        )?,
        _ => write_data_in(&gate, authority, next.plugins_mut(), &key, data)?,
    }
    Ok(next)
}

pub fn write_collection_external_adapter_data(
    authority: &Pubkey,
    collection: &CollectionAccount,
    key: ExternalAdapterKey,
    data: Vec<u8>,
) -> Result<CollectionAccount> {
    // Linked payloads live on the member assets.
    require!(
        key.linked_data_key().is_none(),
        RegistryError::InvalidPluginTarget
    );
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    write_data_in(&gate, authority, next.plugins_mut(), &key, data)?;
    Ok(next)
}
