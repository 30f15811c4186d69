//! Authority resolution for assets and collections.
//!
//! An asset's update authority may indirect through its collection exactly
//! once: the collection's own update authority and the holders of the
//! collection's update delegate all count as the asset's update authority.
//! Resolving through a collection that was not supplied fails closed with
//! `MissingCollection` instead of answering `false`.

use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{Plugin, PluginRecord, PluginType};
use crate::state::{Asset, AssetAccount, Authority, CollectionAccount, UpdateAuthority};

/// The collection an asset links to, checked against the one supplied.
pub fn linked_collection<'a>(
    asset: &Asset,
    collection: Option<&'a CollectionAccount>,
) -> Result<Option<&'a CollectionAccount>> {
    match asset.update_authority {
        UpdateAuthority::Collection(address) => {
            let collection = collection.ok_or(RegistryError::MissingCollection)?;
            require_keys_eq!(
                collection.address(),
                address,
                RegistryError::CollectionMismatch
            );
            Ok(Some(collection))
        }
        UpdateAuthority::Address(_) | UpdateAuthority::None => {
            require!(collection.is_none(), RegistryError::CollectionMismatch);
            Ok(None)
        }
    }
}

/// Keys named by an update delegate record, resolving `Owner` against
/// `owner` when there is one.
fn delegate_keys(record: &PluginRecord, owner: Option<&Pubkey>, keys: &mut Vec<Pubkey>) {
    match record.authority {
        Authority::Address { address } => keys.push(address),
        Authority::Owner => keys.extend(owner.copied()),
        // Already the update authority itself.
        Authority::UpdateAuthority | Authority::None => {}
    }
    if let Plugin::UpdateDelegate(delegate) = &record.plugin {
        keys.extend(delegate.additional_delegates.iter().copied());
    }
}

/// Keys acting as the collection's update authority.
pub fn collection_update_authorities(
    collection: &CollectionAccount,
    owner: Option<&Pubkey>,
) -> Vec<Pubkey> {
    let mut keys = vec![collection.base().update_authority];
    if let Some(record) = collection.plugins().plugin(PluginType::UpdateDelegate) {
        delegate_keys(record, owner, &mut keys);
    }
    keys.dedup();
    keys
}

/// Every key that holds the asset's effective update authority.
pub fn effective_update_authority(
    asset: &Asset,
    collection: Option<&CollectionAccount>,
) -> Result<Vec<Pubkey>> {
    match asset.update_authority {
        UpdateAuthority::None => Ok(Vec::new()),
        UpdateAuthority::Address(address) => Ok(vec![address]),
        UpdateAuthority::Collection(_) => {
            let collection =
                linked_collection(asset, collection)?.ok_or(RegistryError::MissingCollection)?;
            Ok(collection_update_authorities(collection, Some(&asset.owner)))
        }
    }
}

/// Whether `candidate` satisfies `authority` in the context of an asset.
pub fn satisfies(
    candidate: &Pubkey,
    authority: &Authority,
    asset: &Asset,
    collection: Option<&CollectionAccount>,
) -> Result<bool> {
    Ok(match authority {
        Authority::None => false,
        Authority::Owner => *candidate == asset.owner,
        Authority::Address { address } => candidate == address,
        Authority::UpdateAuthority => {
            effective_update_authority(asset, collection)?.contains(candidate)
        }
    })
}

/// Effective update authority, or an asset-local update delegate.
pub fn has_update_authority(
    candidate: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
) -> Result<bool> {
    let base = asset.base();
    if effective_update_authority(base, collection)?.contains(candidate) {
        return Ok(true);
    }

    let mut keys = Vec::new();
    if let Some(record) = asset.plugins().plugin(PluginType::UpdateDelegate) {
        delegate_keys(record, Some(&base.owner), &mut keys);
    }
    Ok(keys.contains(candidate))
}

/// Whether `candidate` acts as the collection's update authority.
pub fn has_collection_update_authority(candidate: &Pubkey, collection: &CollectionAccount) -> bool {
    collection_update_authorities(collection, None).contains(candidate)
}

/// Whether `candidate` satisfies `authority` for a record on a collection.
/// Collections have no owner, so `Owner` never matches.
pub fn satisfies_on_collection(
    candidate: &Pubkey,
    authority: &Authority,
    collection: &CollectionAccount,
) -> bool {
    match authority {
        Authority::None | Authority::Owner => false,
        Authority::Address { address } => candidate == address,
        Authority::UpdateAuthority => has_collection_update_authority(candidate, collection),
    }
}
