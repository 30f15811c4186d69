use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{Plugin, PluginAuthorityPair, PluginType};
use crate::processor::Gate;
use crate::registry::PluginSet;
use crate::state::{AssetAccount, Authority, CollectionAccount};

/// Add an internal plugin to `set`. Creation skips the signer check, the
/// creator implicitly holds every authority over a fresh entity.
pub(crate) fn add_plugin_to(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    pair: PluginAuthorityPair,
    creating: bool,
) -> Result<()> {
    let kind = pair.plugin.plugin_type();
    require!(gate.allows_plugin(kind), RegistryError::InvalidPluginTarget);
    require!(
        creating || !kind.is_creation_only(),
        RegistryError::ImmutableRecord
    );
    require!(set.plugin(kind).is_none(), RegistryError::DuplicateRecord);
    pair.plugin.validate()?;
    if !creating {
        require!(gate.manages(authority, kind)?, RegistryError::InvalidAuthority);
    }

    set.add_plugin(pair.into_record())?;
    msg!("Added {:?} plugin", kind);
    Ok(())
}

fn remove_plugin_from(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    kind: PluginType,
) -> Result<()> {
    let record = set.plugin(kind).ok_or(RegistryError::PluginNotFound)?;
    require!(!record.authority.is_none(), RegistryError::ImmutableRecord);
    require!(!kind.is_creation_only(), RegistryError::ImmutableRecord);
    // An engaged freeze has to be lifted before its plugin goes away.
    require!(!record.plugin.is_frozen(), RegistryError::AssetFrozen);
    require!(
        gate.satisfies(authority, &record.authority)? || gate.manages(authority, kind)?,
        RegistryError::InvalidAuthority
    );

    set.remove_plugin(kind)?;
    msg!("Removed {:?} plugin", kind);
    Ok(())
}

fn update_plugin_in(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    plugin: Plugin,
) -> Result<()> {
    let kind = plugin.plugin_type();
    let record = set.plugin(kind).ok_or(RegistryError::PluginNotFound)?;
    require!(!record.authority.is_none(), RegistryError::ImmutableRecord);
    require!(
        gate.satisfies(authority, &record.authority)?,
        RegistryError::InvalidAuthority
    );
    plugin.validate()?;

    let delta = set.replace_plugin(plugin)?;
    msg!("Updated {:?} plugin ({} bytes moved)", kind, delta);
    Ok(())
}

fn approve_plugin_in(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    kind: PluginType,
    new_authority: Authority,
) -> Result<()> {
    let record = set.plugin(kind).ok_or(RegistryError::PluginNotFound)?;
    require!(!record.authority.is_none(), RegistryError::ImmutableRecord);
    // Reassigning a frozen freeze plugin is refused no matter who asks.
    require!(!record.plugin.is_frozen(), RegistryError::AssetFrozen);
    require!(
        gate.manages(authority, kind)? || gate.satisfies(authority, &record.authority)?,
        RegistryError::InvalidAuthority
    );

    set.set_plugin_authority(kind, new_authority)?;
    msg!("Approved {:?} authority for {:?} plugin", new_authority, kind);
    Ok(())
}

fn revoke_plugin_in(
    gate: &Gate,
    authority: &Pubkey,
    set: &mut PluginSet,
    kind: PluginType,
) -> Result<()> {
    let record = set.plugin(kind).ok_or(RegistryError::PluginNotFound)?;
    require!(!record.authority.is_none(), RegistryError::ImmutableRecord);
    require!(!record.plugin.is_frozen(), RegistryError::AssetFrozen);
    require!(
        gate.manages(authority, kind)? || gate.satisfies(authority, &record.authority)?,
        RegistryError::InvalidAuthority
    );

    set.set_plugin_authority(kind, kind.manager())?;
    msg!("Revoked authority for {:?} plugin", kind);
    Ok(())
}

pub fn add_plugin(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    pair: PluginAuthorityPair,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    add_plugin_to(&gate, authority, next.plugins_mut(), pair, false)?;
    Ok(next)
}

pub fn add_collection_plugin(
    authority: &Pubkey,
    collection: &CollectionAccount,
    pair: PluginAuthorityPair,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    add_plugin_to(&gate, authority, next.plugins_mut(), pair, false)?;
    Ok(next)
}

pub fn remove_plugin(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    kind: PluginType,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    remove_plugin_from(&gate, authority, next.plugins_mut(), kind)?;
    Ok(next)
}

pub fn remove_collection_plugin(
    authority: &Pubkey,
    collection: &CollectionAccount,
    kind: PluginType,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    remove_plugin_from(&gate, authority, next.plugins_mut(), kind)?;
    Ok(next)
}

pub fn update_plugin(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    plugin: Plugin,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    update_plugin_in(&gate, authority, next.plugins_mut(), plugin)?;
    Ok(next)
}

pub fn update_collection_plugin(
    authority: &Pubkey,
    collection: &CollectionAccount,
    plugin: Plugin,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    update_plugin_in(&gate, authority, next.plugins_mut(), plugin)?;
    Ok(next)
}

pub fn approve_plugin_authority(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    kind: PluginType,
    new_authority: Authority,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    approve_plugin_in(&gate, authority, next.plugins_mut(), kind, new_authority)?;
    Ok(next)
}

pub fn approve_collection_plugin_authority(
    authority: &Pubkey,
    collection: &CollectionAccount,
    kind: PluginType,
    new_authority: Authority,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    approve_plugin_in(&gate, authority, next.plugins_mut(), kind, new_authority)?;
    Ok(next)
}

pub fn revoke_plugin_authority(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    kind: PluginType,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let mut next = asset.clone();
    revoke_plugin_in(&gate, authority, next.plugins_mut(), kind)?;
    Ok(next)
}

pub fn revoke_collection_plugin_authority(
    authority: &Pubkey,
    collection: &CollectionAccount,
    kind: PluginType,
) -> Result<CollectionAccount> {
    let gate = Gate::collection(collection);
    let mut next = collection.clone();
    revoke_plugin_in(&gate, authority, next.plugins_mut(), kind)?;
    Ok(next)
}
