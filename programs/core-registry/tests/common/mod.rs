#![allow(dead_code)]

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use core_registry::errors::RegistryError;
use core_registry::plugins::{
    DataSchema, ExternalAdapterInitInfo, ExternalPluginAdapter, LinkedAppData, NoOracles,
};
use core_registry::processor::{
    create_asset, create_collection, CreateAssetArgs, CreateCollectionArgs,
};
use core_registry::state::{AssetAccount, Authority, CollectionAccount};

pub fn code(error: Error) -> u32 {
    match error {
        Error::AnchorError(error) => error.error_code_number,
        other => panic!("unexpected error: {other:?}"),
    }
}

pub fn expect_err<T: std::fmt::Debug>(result: Result<T>, expected: RegistryError) {
    assert_eq!(code(result.unwrap_err()), u32::from(expected));
}

pub struct Fixture {
    pub owner: Pubkey,
    pub update_authority: Pubkey,
    pub collection: CollectionAccount,
    pub asset: AssetAccount,
}

/// "Test Asset" inside a collection, with `collection_args` applied to the
/// collection and `asset_args` to the asset.
pub fn in_collection(
    collection_args: CreateCollectionArgs,
    asset_args: CreateAssetArgs,
) -> Fixture {
    let owner = Pubkey::new_unique();
    let update_authority = Pubkey::new_unique();
    let collection =
        create_collection(&update_authority, Pubkey::new_unique(), collection_args).unwrap();
    let created = create_asset(
        &update_authority,
        Pubkey::new_unique(),
        owner,
        Some(&collection),
        asset_args,
        &NoOracles,
    )
    .unwrap();

    Fixture {
        owner,
        update_authority,
        collection: created.collection.unwrap(),
        asset: created.asset,
    }
}

pub fn test_asset() -> CreateAssetArgs {
    CreateAssetArgs::new("Test Asset", "https://example.com/asset")
}

pub fn test_collection() -> CreateCollectionArgs {
    CreateCollectionArgs::new("Test Collection", "https://example.com/collection")
}

pub fn linked_app_data(data_authority: Authority) -> ExternalAdapterInitInfo {
    ExternalAdapterInitInfo::new(ExternalPluginAdapter::LinkedAppData(LinkedAppData {
        data_authority,
        schema: DataSchema::Binary,
    }))
}

/// Encode and decode again, so assertions see what the account stores.
pub fn reloaded(asset: &AssetAccount) -> AssetAccount {
    let bytes = asset.to_bytes().unwrap();
    assert_eq!(bytes.len() as u64, asset.encoded_len().unwrap());
    AssetAccount::from_bytes(asset.address(), &bytes).unwrap()
}
