use anchor_lang::prelude::*;

use crate::events::{AssetBurned, AssetTransferred};
use crate::instructions::{
    close, config, load, load_optional, store, CollectionMutation, RemainingOracles,
};
use crate::processor::{self, UpdateAssetArgs, UpdateCollectionArgs};
use crate::state::{Asset, Collection};

#[derive(Accounts)]
pub struct TransferAsset<'info> {
    /// CHECK: owner and layout are checked when the asset is decoded
    #[account(mut)]
    pub asset: UncheckedAccount<'info>,

    /// CHECK: must match the asset's collection link, checked by the processor
    pub collection: Option<UncheckedAccount<'info>>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: any key may receive an asset
    pub new_owner: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct BurnAsset<'info> {
    /// CHECK: owner and layout are checked when the asset is decoded
    #[account(mut)]
    pub asset: UncheckedAccount<'info>,

    /// CHECK: must match the asset's collection link, checked by the processor
    #[account(mut)]
    pub collection: Option<UncheckedAccount<'info>>,

    pub authority: Signer<'info>,

    /// Receives the asset's rent.
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateAsset<'info> {
    /// CHECK: owner and layout are checked when the asset is decoded
    #[account(mut)]
    pub asset: UncheckedAccount<'info>,

    /// CHECK: must match the asset's collection link, checked by the processor
    #[account(mut)]
    pub collection: Option<UncheckedAccount<'info>>,

    /// CHECK: collection the asset moves into, checked by the processor
    #[account(mut)]
    pub new_collection: Option<UncheckedAccount<'info>>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn transfer(ctx: Context<TransferAsset>) -> Result<()> {
    let config = config(ctx.program_id);
    let accounts = &ctx.accounts;
    let asset = load::<Asset>(&accounts.asset, &config)?;
    let collection = load_optional::<Collection>(accounts.collection.as_ref(), &config)?;

    let next = processor::transfer(
        accounts.authority.key,
        &asset,
        collection.as_ref(),
        *accounts.new_owner.key,
        &RemainingOracles(ctx.remaining_accounts),
    )?;
    store(
        &accounts.asset,
        &next,
        &accounts.payer,
        &accounts.system_program,
        &config,
    )?;

    emit!(AssetTransferred {
        asset: asset.address(),
        from: asset.base().owner,
        to: next.base().owner,
    });
    Ok(())
}

pub fn burn(ctx: Context<BurnAsset>) -> Result<()> {
    let config = config(ctx.program_id);
    let accounts = &ctx.accounts;
    let asset = load::<Asset>(&accounts.asset, &config)?;
    let collection = load_optional::<Collection>(accounts.collection.as_ref(), &config)?;

    let remaining = processor::burn(
        accounts.authority.key,
        &asset,
        collection.as_ref(),
        &RemainingOracles(ctx.remaining_accounts),
    )?;
    if let (Some(info), Some(next)) = (accounts.collection.as_ref(), remaining.as_ref()) {
        store(info, next, &accounts.payer, &accounts.system_program, &config)?;
    }
    close(&accounts.asset, &accounts.payer)?;

    emit!(AssetBurned {
        asset: asset.address(),
        collection: collection.as_ref().map(|collection| collection.address()),
    });
    Ok(())
}

pub fn update(ctx: Context<UpdateAsset>, args: UpdateAssetArgs) -> Result<()> {
    let config = config(ctx.program_id);
    let accounts = &ctx.accounts;
    let asset = load::<Asset>(&accounts.asset, &config)?;
    let collection = load_optional::<Collection>(accounts.collection.as_ref(), &config)?;
    let new_collection = load_optional::<Collection>(accounts.new_collection.as_ref(), &config)?;

    let updated = processor::update(
        accounts.authority.key,
        &asset,
        collection.as_ref(),
        new_collection.as_ref(),
        args,
        &RemainingOracles(ctx.remaining_accounts),
    )?;
    store(
        &accounts.asset,
        &updated.asset,
        &accounts.payer,
        &accounts.system_program,
        &config,
    )?;
    if let (Some(info), Some(next)) = (
        accounts.collection.as_ref(),
        updated.previous_collection.as_ref(),
    ) {
        store(info, next, &accounts.payer, &accounts.system_program, &config)?;
    }
    if let (Some(info), Some(next)) = (
        accounts.new_collection.as_ref(),
        updated.new_collection.as_ref(),
    ) {
        store(info, next, &accounts.payer, &accounts.system_program, &config)?;
    }
    Ok(())
}

pub fn update_collection(
    ctx: Context<CollectionMutation>,
    args: UpdateCollectionArgs,
) -> Result<()> {
    let collection = ctx.accounts.decode(ctx.program_id)?;
    let next = processor::update_collection(
        ctx.accounts.authority.key,
        &collection,
        args,
        &RemainingOracles(ctx.remaining_accounts),
    )?;
    ctx.accounts.commit(ctx.program_id, &next)
}
