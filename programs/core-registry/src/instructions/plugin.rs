use anchor_lang::prelude::*;

use crate::instructions::{config, load, load_optional, store};
use crate::plugins::{Plugin, PluginAuthorityPair, PluginType};
use crate::processor;
use crate::state::{Asset, AssetAccount, Authority, Collection, CollectionAccount};

/// Accounts for mutating an asset's own records.
#[derive(Accounts)]
pub struct AssetMutation<'info> {
    /// CHECK: owner and layout are checked when the asset is decoded
    #[account(mut)]
    pub asset: UncheckedAccount<'info>,

    /// CHECK: must match the asset's collection link, checked by the processor
    pub collection: Option<UncheckedAccount<'info>>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> AssetMutation<'info> {
    pub(crate) fn decode(
        &self,
        program_id: &Pubkey,
    ) -> Result<(AssetAccount, Option<CollectionAccount>)> {
        let config = config(program_id);
        let asset = load::<Asset>(&self.asset, &config)?;
        let collection = load_optional::<Collection>(self.collection.as_ref(), &config)?;
        Ok((asset, collection))
    }

    pub(crate) fn commit(&self, program_id: &Pubkey, next: &AssetAccount) -> Result<()> {
        let config = config(program_id);
        store(&self.asset, next, &self.payer, &self.system_program, &config)
    }
}

/// Accounts for mutating a collection's own records.
#[derive(Accounts)]
pub struct CollectionMutation<'info> {
    /// CHECK: owner and layout are checked when the collection is decoded
    #[account(mut)]
    pub collection: UncheckedAccount<'info>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> CollectionMutation<'info> {
    pub(crate) fn decode(&self, program_id: &Pubkey) -> Result<CollectionAccount> {
        load::<Collection>(&self.collection, &config(program_id))
    }

    pub(crate) fn commit(&self, program_id: &Pubkey, next: &CollectionAccount) -> Result<()> {
        let config = config(program_id);
        store(
            &self.collection,
            next,
            &self.payer,
            &self.system_program,
            &config,
        )
    }
}

pub fn add_plugin(ctx: Context<AssetMutation>, pair: PluginAuthorityPair) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::add_plugin(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        pair,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn remove_plugin(ctx: Context<AssetMutation>, plugin_type: PluginType) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::remove_plugin(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        plugin_type,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn update_plugin(ctx: Context<AssetMutation>, plugin: Plugin) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::update_plugin(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        plugin,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn approve_plugin_authority(
    ctx: Context<AssetMutation>,
    plugin_type: PluginType,
    new_authority: Authority,
) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::approve_plugin_authority(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        plugin_type,
        new_authority,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn revoke_plugin_authority(ctx: Context<AssetMutation>, plugin_type: PluginType) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::revoke_plugin_authority(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        plugin_type,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn add_collection_plugin(
    ctx: Context<CollectionMutation>,
    pair: PluginAuthorityPair,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::add_collection_plugin(ctx.accounts.authority.key, &collection, pair)?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn remove_collection_plugin(
    ctx: Context<CollectionMutation>,
    plugin_type: PluginType,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next =
        processor::remove_collection_plugin(ctx.accounts.authority.key, &collection, plugin_type)?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn update_collection_plugin(ctx: Context<CollectionMutation>, plugin: Plugin) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next =
        processor::update_collection_plugin(ctx.accounts.authority.key, &collection, plugin)?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn approve_collection_plugin_authority(
    ctx: Context<CollectionMutation>,
    plugin_type: PluginType,
    new_authority: Authority,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::approve_collection_plugin_authority(
        ctx.accounts.authority.key,
        &collection,
        plugin_type,
        new_authority,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn revoke_collection_plugin_authority(
    ctx: Context<CollectionMutation>,
    plugin_type: PluginType,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::revoke_collection_plugin_authority(
        ctx.accounts.authority.key,
        &collection,
        plugin_type,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}
