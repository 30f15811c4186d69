//! Read side: decode raw accounts into registry accounts and derived views.
//!
//! Fetchers return the raw record sets. Callers that present effective
//! plugin state run assets through [`DerivedAssetView`] (or use
//! [`fetch_asset_view`], which resolves the collection itself).

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::ProgramConfig;
use crate::errors::RegistryError;
use crate::state::{
    Asset, AssetAccount, Collection, CollectionAccount, CoreEntity, Key, RegistryAccount,
    UpdateAuthority,
};
use crate::view::DerivedAssetView;

/// Raw account as returned by an RPC node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Where raw accounts come from. Transport is the implementor's concern.
pub trait AccountSource {
    fn get_account(&self, address: &Pubkey) -> Option<RawAccount>;

    /// Every account owned by `program_id`.
    fn program_accounts(&self, program_id: &Pubkey) -> Vec<(Pubkey, RawAccount)>;
}

impl AccountSource for BTreeMap<Pubkey, RawAccount> {
    fn get_account(&self, address: &Pubkey) -> Option<RawAccount> {
        self.get(address).cloned()
    }

    fn program_accounts(&self, program_id: &Pubkey) -> Vec<(Pubkey, RawAccount)> {
        self.iter()
            .filter(|(_, account)| account.owner == *program_id)
            .map(|(address, account)| (*address, account.clone()))
            .collect()
    }
}

fn decode<T: CoreEntity>(
    config: &ProgramConfig,
    address: Pubkey,
    account: &RawAccount,
) -> Result<RegistryAccount<T>> {
    require_keys_eq!(
        account.owner,
        config.program_id,
        RegistryError::InvalidProgramOwner
    );
    require!(
        Key::peek(&account.data)? == T::KEY,
        RegistryError::InvalidAccountKey
    );
    RegistryAccount::from_bytes(address, &account.data)
}

fn fetch<T: CoreEntity>(
    source: &impl AccountSource,
    config: &ProgramConfig,
    address: &Pubkey,
) -> Result<RegistryAccount<T>> {
    let account = source
        .get_account(address)
        .ok_or(RegistryError::AccountNotFound)?;
    decode(config, *address, &account)
}

/// Every account of kind `T` owned by the program that `keep` accepts.
/// Accounts of other kinds are skipped; a malformed account of kind `T`
/// fails the whole scan.
fn scan<T: CoreEntity>(
    source: &impl AccountSource,
    config: &ProgramConfig,
    keep: impl Fn(&T) -> bool,
) -> Result<Vec<RegistryAccount<T>>> {
    let mut found = Vec::new();
    for (address, account) in source.program_accounts(&config.program_id) {
        if Key::peek(&account.data).ok() != Some(T::KEY) {
            continue;
        }
        let decoded = decode::<T>(config, address, &account)?;
        if keep(decoded.base()) {
            found.push(decoded);
        }
    }
    Ok(found)
}

pub fn fetch_asset(
    source: &impl AccountSource,
    config: &ProgramConfig,
    address: &Pubkey,
) -> Result<AssetAccount> {
    fetch(source, config, address)
}

pub fn fetch_collection(
    source: &impl AccountSource,
    config: &ProgramConfig,
    address: &Pubkey,
) -> Result<CollectionAccount> {
    fetch(source, config, address)
}

/// Fetch an asset and, when it is linked, its collection, then derive the
/// effective plugin state.
pub fn fetch_asset_view(
    source: &impl AccountSource,
    config: &ProgramConfig,
    address: &Pubkey,
) -> Result<(AssetAccount, DerivedAssetView)> {
    let asset = fetch_asset(source, config, address)?;
    let collection = asset
        .base()
        .update_authority
        .collection()
        .map(|collection| fetch_collection(source, config, &collection))
        .transpose()?;
    let view = DerivedAssetView::derive(&asset, collection.as_ref())?;
    Ok((asset, view))
}

pub fn fetch_assets_by_owner(
    source: &impl AccountSource,
    config: &ProgramConfig,
    owner: &Pubkey,
) -> Result<Vec<AssetAccount>> {
    scan(source, config, |asset: &Asset| asset.owner == *owner)
}

pub fn fetch_assets_by_collection(
    source: &impl AccountSource,
    config: &ProgramConfig,
    collection: &Pubkey,
) -> Result<Vec<AssetAccount>> {
    scan(source, config, |asset: &Asset| {
        asset.update_authority.collection() == Some(*collection)
    })
}

/// Assets whose stored update authority is exactly `update_authority`.
/// Collection members match on `UpdateAuthority::Collection`, not on the
/// collection's own authority.
pub fn fetch_assets_by_update_authority(
    source: &impl AccountSource,
    config: &ProgramConfig,
    update_authority: &UpdateAuthority,
) -> Result<Vec<AssetAccount>> {
    scan(source, config, |asset: &Asset| {
        asset.update_authority == *update_authority
    })
}

pub fn fetch_collections_by_update_authority(
    source: &impl AccountSource,
    config: &ProgramConfig,
    update_authority: &Pubkey,
) -> Result<Vec<CollectionAccount>> {
    scan(source, config, |collection: &Collection| {
        collection.update_authority == *update_authority
    })
}
