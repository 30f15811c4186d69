use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod fetch;
pub mod instructions;
pub mod plugins;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod utils;
pub mod view;

#[cfg(test)]
mod test_utils;

use instructions::*;
use plugins::{
    ExternalAdapterInitInfo, ExternalAdapterKey, ExternalAdapterUpdateInfo, Plugin,
    PluginAuthorityPair, PluginType,
};
use processor::{CreateAssetArgs, CreateCollectionArgs, UpdateAssetArgs, UpdateCollectionArgs};
use state::Authority;

declare_id!("24JWGXuKjWqPsZCGZhLUQKkRZADsgnptjX4F5JUqAJ13");

#[program]
pub mod core_registry {
    use super::*;

    /// Create an asset, optionally inside a collection
    pub fn create_asset(ctx: Context<CreateAsset>, args: CreateAssetArgs) -> Result<()> {
        instructions::create_asset(ctx, args)
    }

    /// Create a collection
    pub fn create_collection(
        ctx: Context<CreateCollection>,
        args: CreateCollectionArgs,
    ) -> Result<()> {
        instructions::create_collection(ctx, args)
    }

    pub fn add_plugin(ctx: Context<AssetMutation>, pair: PluginAuthorityPair) -> Result<()> {
        instructions::add_plugin(ctx, pair)
    }

    pub fn remove_plugin(ctx: Context<AssetMutation>, plugin_type: PluginType) -> Result<()> {
        instructions::remove_plugin(ctx, plugin_type)
    }

    pub fn update_plugin(ctx: Context<AssetMutation>, plugin: Plugin) -> Result<()> {
        instructions::update_plugin(ctx, plugin)
    }

    pub fn approve_plugin_authority(
        ctx: Context<AssetMutation>,
        plugin_type: PluginType,
        new_authority: Authority,
    ) -> Result<()> {
        instructions::approve_plugin_authority(ctx, plugin_type, new_authority)
    }

    /// Hand a plugin back to the party that manages its kind
    pub fn revoke_plugin_authority(
        ctx: Context<AssetMutation>,
        plugin_type: PluginType,
    ) -> Result<()> {
        instructions::revoke_plugin_authority(ctx, plugin_type)
    }

    pub fn add_collection_plugin(
        ctx: Context<CollectionMutation>,
        pair: PluginAuthorityPair,
    ) -> Result<()> {
        instructions::add_collection_plugin(ctx, pair)
    }

    pub fn remove_collection_plugin(
        ctx: Context<CollectionMutation>,
        plugin_type: PluginType,
    ) -> Result<()> {
        instructions::remove_collection_plugin(ctx, plugin_type)
    }

    pub fn update_collection_plugin(
        ctx: Context<CollectionMutation>,
        plugin: Plugin,
    ) -> Result<()> {
        instructions::update_collection_plugin(ctx, plugin)
    }

    pub fn approve_collection_plugin_authority(
        ctx: Context<CollectionMutation>,
        plugin_type: PluginType,
        new_authority: Authority,
    ) -> Result<()> {
        instructions::approve_collection_plugin_authority(ctx, plugin_type, new_authority)
    }

    pub fn revoke_collection_plugin_authority(
        ctx: Context<CollectionMutation>,
        plugin_type: PluginType,
    ) -> Result<()> {
        instructions::revoke_collection_plugin_authority(ctx, plugin_type)
    }

    pub fn add_external_adapter(
        ctx: Context<AssetMutation>,
        info: ExternalAdapterInitInfo,
    ) -> Result<()> {
        instructions::add_external_adapter(ctx, info)
    }

    pub fn remove_external_adapter(
        ctx: Context<AssetMutation>,
        key: ExternalAdapterKey,
    ) -> Result<()> {
        instructions::remove_external_adapter(ctx, key)
    }

    pub fn update_external_adapter(
        ctx: Context<AssetMutation>,
        key: ExternalAdapterKey,
        info: ExternalAdapterUpdateInfo,
    ) -> Result<()> {
        instructions::update_external_adapter(ctx, key, info)
    }

    /// Replace an adapter payload; linked keys write the asset's data section
    pub fn write_external_adapter_data(
        ctx: Context<AssetMutation>,
        key: ExternalAdapterKey,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::write_external_adapter_data(ctx, key, data)
    }

    pub fn add_collection_external_adapter(
        ctx: Context<CollectionMutation>,
        info: ExternalAdapterInitInfo,
    ) -> Result<()> {
        instructions::add_collection_external_adapter(ctx, info)
    }

    pub fn remove_collection_external_adapter(
        ctx: Context<CollectionMutation>,
        key: ExternalAdapterKey,
    ) -> Result<()> {
        instructions::remove_collection_external_adapter(ctx, key)
    }

    pub fn update_collection_external_adapter(
        ctx: Context<CollectionMutation>,
        key: ExternalAdapterKey,
        info: ExternalAdapterUpdateInfo,
    ) -> Result<()> {
        instructions::update_collection_external_adapter(ctx, key, info)
    }

    pub fn write_collection_external_adapter_data(
        ctx: Context<CollectionMutation>,
        key: ExternalAdapterKey,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::write_collection_external_adapter_data(ctx, key, data)
    }

    /// Move an asset to a new owner
    pub fn transfer(ctx: Context<TransferAsset>) -> Result<()> {
        instructions::transfer(ctx)
    }

    /// Burn an asset and refund its rent to the payer
    pub fn burn(ctx: Context<BurnAsset>) -> Result<()> {
        instructions::burn(ctx)
    }

    pub fn update(ctx: Context<UpdateAsset>, args: UpdateAssetArgs) -> Result<()> {
        instructions::update(ctx, args)
    }

    pub fn update_collection(
        ctx: Context<CollectionMutation>,
        args: UpdateCollectionArgs,
    ) -> Result<()> {
        instructions::update_collection(ctx, args)
    }
}
