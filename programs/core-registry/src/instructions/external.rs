use anchor_lang::prelude::*;

use crate::events::AdapterDataWritten;
use crate::instructions::{AssetMutation, CollectionMutation};
use crate::plugins::{ExternalAdapterInitInfo, ExternalAdapterKey, ExternalAdapterUpdateInfo};
use crate::processor;

pub fn add_external_adapter(
    ctx: Context<AssetMutation>,
    info: ExternalAdapterInitInfo,
) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::add_external_adapter(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        info,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn remove_external_adapter(ctx: Context<AssetMutation>, key: ExternalAdapterKey) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::remove_external_adapter(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        key,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn update_external_adapter(
    ctx: Context<AssetMutation>,
    key: ExternalAdapterKey,
    info: ExternalAdapterUpdateInfo,
) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::update_external_adapter(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        key,
        info,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn write_external_adapter_data(
    ctx: Context<AssetMutation>,
    key: ExternalAdapterKey,
    data: Vec<u8>,
) -> Result<()> {
    let (asset, collection) = ctx.accounts.decode(ctx.program_id)?;
    let data_len = data.len() as u64;
    let next = processor::write_external_adapter_data(
        ctx.accounts.authority.key,
        &asset,
        collection.as_ref(),
        key,
        data,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)?;

    emit!(AdapterDataWritten {
        account: asset.address(),
        key,
        data_len,
    });
    Ok(())
}

pub fn add_collection_external_adapter(
    ctx: Context<CollectionMutation>,
    info: ExternalAdapterInitInfo,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next =
        processor::add_collection_external_adapter(ctx.accounts.authority.key, &collection, info)?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn remove_collection_external_adapter(
    ctx: Context<CollectionMutation>,
    key: ExternalAdapterKey,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::remove_collection_external_adapter(
        ctx.accounts.authority.key,
        &collection,
        key,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn update_collection_external_adapter(
    ctx: Context<CollectionMutation>,
    key: ExternalAdapterKey,
    info: ExternalAdapterUpdateInfo,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::update_collection_external_adapter(
        ctx.accounts.authority.key,
        &collection,
        key,
        info,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}

pub fn write_collection_external_adapter_data(
    ctx: Context<CollectionMutation>,
    key: ExternalAdapterKey,
    data: Vec<u8>,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let data_len = data.len() as u64;
    let next = processor::write_collection_external_adapter_data(
        ctx.accounts.authority.key,
        &collection,
        key,
        data,
    )?;
    ctx.accounts.commit(ctx.program_id, &next)?;

    emit!(AdapterDataWritten {
        account: collection.address(),
        key,
        data_len,
    });
    Ok(())
}
