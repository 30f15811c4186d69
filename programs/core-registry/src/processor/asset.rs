use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{LifecycleEvent, OracleAccounts, PluginType};
use crate::processor::{check_oracles, Gate};
use crate::resolver::has_collection_update_authority;
use crate::state::{AssetAccount, Authority, CollectionAccount, UpdateAuthority};
use crate::view::DerivedAssetView;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateAssetArgs {
    pub new_name: Option<String>,
    pub new_uri: Option<String>,
    /// `Collection(..)` moves the asset into that collection, which must be
    /// supplied alongside.
    pub new_update_authority: Option<UpdateAuthority>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateCollectionArgs {
    pub new_name: Option<String>,
    pub new_uri: Option<String>,
    pub new_update_authority: Option<Pubkey>,
}

/// New states produced by an asset update. Collections are only returned
/// when their counters changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatedAsset {
    pub asset: AssetAccount,
    pub previous_collection: Option<CollectionAccount>,
    pub new_collection: Option<CollectionAccount>,
}

/// Whether the entry governing `kind` is held by `candidate`.
fn governing_allows(
    view: &DerivedAssetView,
    gate: &Gate,
    kind: PluginType,
    candidate: &Pubkey,
) -> Result<bool> {
    match view.plugin(kind) {
        Some(entry) => gate.satisfies(candidate, &entry.record.authority),
        None => Ok(false),
    }
}

pub fn transfer(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    new_owner: Pubkey,
    oracles: &dyn OracleAccounts,
) -> Result<AssetAccount> {
    let gate = Gate::asset(asset, collection)?;
    let view = DerivedAssetView::derive(asset, collection)?;
    require!(!view.is_frozen(), RegistryError::AssetFrozen);

    let allowed = *authority == asset.base().owner
        || governing_allows(&view, &gate, PluginType::TransferDelegate, authority)?
        || governing_allows(&view, &gate, PluginType::PermanentTransferDelegate, authority)?;
    require!(allowed, RegistryError::InvalidAuthority);

    check_oracles(
        view.adapters.values().map(|adapter| &adapter.record),
        LifecycleEvent::Transfer,
        oracles,
    )?;

    let mut next = asset.clone();
    next.update_base(|base| {
        base.owner = new_owner;
        Ok(())
    })?;
    // Delegations the previous owner granted do not carry over.
    let owner_managed: Vec<PluginType> = next
        .plugins()
        .plugins()
        .map(|record| record.plugin_type())
        .filter(|kind| kind.is_owner_managed())
        .collect();
    for kind in owner_managed {
        next.plugins_mut().set_plugin_authority(kind, Authority::Owner)?;
    }

    msg!("Transferred asset {} to {}", asset.address(), new_owner);
    Ok(next)
}

/// Checks a burn and returns the collection with its size decremented, if
/// the asset was in one. The asset account itself is closed by the caller.
pub fn burn(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    oracles: &dyn OracleAccounts,
) -> Result<Option<CollectionAccount>> {
    let gate = Gate::asset(asset, collection)?;
    let view = DerivedAssetView::derive(asset, collection)?;
    require!(!view.is_frozen(), RegistryError::AssetFrozen);

    let allowed = *authority == asset.base().owner
        || governing_allows(&view, &gate, PluginType::BurnDelegate, authority)?
        || governing_allows(&view, &gate, PluginType::PermanentBurnDelegate, authority)?;
    require!(allowed, RegistryError::InvalidAuthority);

    check_oracles(
        view.adapters.values().map(|adapter| &adapter.record),
        LifecycleEvent::Burn,
        oracles,
    )?;

    let collection = collection
        .map(|collection| -> Result<CollectionAccount> {
            let mut next = collection.clone();
            next.update_base(|base| base.leave())?;
            Ok(next)
        })
        .transpose()?;

    msg!("Burned asset {}", asset.address());
    Ok(collection)
}

/// Update name, uri or update authority. Moving into a collection needs the
/// signer to act for both the asset and the target collection.
pub fn update(
    authority: &Pubkey,
    asset: &AssetAccount,
    collection: Option<&CollectionAccount>,
    new_collection: Option<&CollectionAccount>,
    args: UpdateAssetArgs,
    oracles: &dyn OracleAccounts,
) -> Result<UpdatedAsset> {
    let gate = Gate::asset(asset, collection)?;
    require!(
        gate.is_update_authority(authority)?,
        RegistryError::InvalidAuthority
    );
    let view = DerivedAssetView::derive(asset, collection)?;
    if args.new_name.is_some() || args.new_uri.is_some() {
        require!(
            !view.has_immutable_metadata(),
            RegistryError::ImmutableRecord
        );
    }
    check_oracles(
        view.adapters.values().map(|adapter| &adapter.record),
        LifecycleEvent::Update,
        oracles,
    )?;

    let current = asset.base().update_authority;
    let mut previous_collection = None;
    let mut joined_collection = None;
    if let Some(new_update_authority) = args.new_update_authority {
        if let UpdateAuthority::Collection(address) = new_update_authority {
            let target = new_collection.ok_or(RegistryError::MissingCollection)?;
            require_keys_eq!(
                target.address(),
                address,
                RegistryError::CollectionMismatch
            );
            require!(
                has_collection_update_authority(authority, target),
                RegistryError::InvalidAuthority
            );
            if current.collection() != Some(address) {
                let mut next = target.clone();
                next.update_base(|base| base.join())?;
                joined_collection = Some(next);
            }
        } else {
            require!(new_collection.is_none(), RegistryError::CollectionMismatch);
        }

        if current.collection() != new_update_authority.collection() {
            if let Some(collection) = collection {
                let mut next = collection.clone();
                next.update_base(|base| base.leave())?;
                previous_collection = Some(next);
            }
        }
    } else {
        require!(new_collection.is_none(), RegistryError::CollectionMismatch);
    }

    let mut next = asset.clone();
    next.update_base(|base| {
        if let Some(name) = args.new_name {
            base.name = name;
        }
        if let Some(uri) = args.new_uri {
            base.uri = uri;
        }
        if let Some(update_authority) = args.new_update_authority {
            base.update_authority = update_authority;
        }
        Ok(())
    })?;

    msg!("Updated asset {}", asset.address());
    Ok(UpdatedAsset {
        asset: next,
        previous_collection,
        new_collection: joined_collection,
    })
}

pub fn update_collection(
    authority: &Pubkey,
    collection: &CollectionAccount,
    args: UpdateCollectionArgs,
    oracles: &dyn OracleAccounts,
) -> Result<CollectionAccount> {
    require!(
        has_collection_update_authority(authority, collection),
        RegistryError::InvalidAuthority
    );
    if args.new_name.is_some() || args.new_uri.is_some() {
        require!(
            collection
                .plugins()
                .plugin(PluginType::ImmutableMetadata)
                .is_none(),
            RegistryError::ImmutableRecord
        );
    }
    let adapters = collection.plugins().adapter_records()?;
    check_oracles(adapters.iter(), LifecycleEvent::Update, oracles)?;

    let mut next = collection.clone();
    next.update_base(|base| {
        if let Some(name) = args.new_name {
            base.name = name;
        }
        if let Some(uri) = args.new_uri {
            base.uri = uri;
        }
        if let Some(update_authority) = args.new_update_authority {
            base.update_authority = update_authority;
        }
        Ok(())
    })?;

    msg!("Updated collection {}", collection.address());
    Ok(next)
}
