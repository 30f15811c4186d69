use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{
    ExternalAdapterInitInfo, LifecycleEvent, OracleAccounts, PluginAuthorityPair,
};
use crate::processor::{add_adapter_to, add_plugin_to, check_oracles, Gate};
use crate::resolver::has_collection_update_authority;
use crate::state::{Asset, AssetAccount, Collection, CollectionAccount, UpdateAuthority};
use crate::view::DerivedAssetView;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateAssetArgs {
    pub name: String,
    pub uri: String,
    /// Plain update authority. Must be `None` when creating into a
    /// collection; defaults to the signer otherwise.
    pub update_authority: Option<Pubkey>,
    pub plugins: Vec<PluginAuthorityPair>,
    pub external_adapters: Vec<ExternalAdapterInitInfo>,
}

impl CreateAssetArgs {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            update_authority: None,
            plugins: Vec::new(),
            external_adapters: Vec::new(),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateCollectionArgs {
    pub name: String,
    pub uri: String,
    /// Defaults to the signer.
    pub update_authority: Option<Pubkey>,
    pub plugins: Vec<PluginAuthorityPair>,
    pub external_adapters: Vec<ExternalAdapterInitInfo>,
}

impl CreateCollectionArgs {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            update_authority: None,
            plugins: Vec::new(),
            external_adapters: Vec::new(),
        }
    }
}

/// A freshly created asset, and its collection with updated counters when
/// the asset was created into one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedAsset {
    pub asset: AssetAccount,
    pub collection: Option<CollectionAccount>,
}

/// Build a new asset owned by `owner`. Creating into a collection requires
/// the signer to act as the collection's update authority.
pub fn create_asset(
    authority: &Pubkey,
    address: Pubkey,
    owner: Pubkey,
    collection: Option<&CollectionAccount>,
    args: CreateAssetArgs,
    oracles: &dyn OracleAccounts,
) -> Result<CreatedAsset> {
    let update_authority = match collection {
        Some(collection) => {
            require!(
                args.update_authority.is_none(),
                RegistryError::CollectionMismatch
            );
            require!(
                has_collection_update_authority(authority, collection),
                RegistryError::InvalidAuthority
            );
            UpdateAuthority::Collection(collection.address())
        }
        None => UpdateAuthority::Address(args.update_authority.unwrap_or(*authority)),
    };

    let shell = AssetAccount::new(
        address,
        Asset::new(owner, update_authority, args.name, args.uri),
    )?;
    let gate = Gate::asset(&shell, collection)?;
    let mut asset = shell.clone();
    for pair in args.plugins {
        add_plugin_to(&gate, authority, asset.plugins_mut(), pair, true)?;
    }
    for info in args.external_adapters {
        add_adapter_to(&gate, authority, asset.plugins_mut(), info, true)?;
    }

    let view = DerivedAssetView::derive(&asset, collection)?;
    check_oracles(
        view.adapters.values().map(|adapter| &adapter.record),
        LifecycleEvent::Create,
        oracles,
    )?;

    let collection = collection
        .map(|collection| -> Result<CollectionAccount> {
            let mut next = collection.clone();
            next.update_base(Collection::increment)?;
            Ok(next)
        })
        .transpose()?;

    msg!("Created asset {}", address);
    Ok(CreatedAsset { asset, collection })
}

pub fn create_collection(
    authority: &Pubkey,
    address: Pubkey,
    args: CreateCollectionArgs,
) -> Result<CollectionAccount> {
    let shell = CollectionAccount::new(
        address,
        Collection::new(
            args.update_authority.unwrap_or(*authority),
            args.name,
            args.uri,
        ),
    )?;
    let gate = Gate::collection(&shell);
    let mut collection = shell.clone();
    for pair in args.plugins {
        add_plugin_to(&gate, authority, collection.plugins_mut(), pair, true)?;
    }
    for info in args.external_adapters {
        add_adapter_to(&gate, authority, collection.plugins_mut(), info, true)?;
    }

    msg!("Created collection {}", address);
    Ok(collection)
}
