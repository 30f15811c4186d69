use anchor_lang::prelude::*;

use crate::instructions::{config, create_account, load_optional, store, RemainingOracles};
use crate::processor::{self, CreateAssetArgs, CreateCollectionArgs};
use crate::state::Collection;
use crate::utils::to_usize;

#[derive(Accounts)]
pub struct CreateAsset<'info> {
    /// Fresh keypair, signs so nobody else can claim the address.
    #[account(mut)]
    pub asset: Signer<'info>,

    /// CHECK: decoded and matched against the signer's authority by the processor
    #[account(mut)]
    pub collection: Option<UncheckedAccount<'info>>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: any key may own an asset, defaults to the payer
    pub owner: Option<UncheckedAccount<'info>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CreateCollection<'info> {
    #[account(mut)]
    pub collection: Signer<'info>,

    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Create an asset, optionally into a collection. Oracle accounts are read
/// from the remaining accounts.
pub fn create_asset(ctx: Context<CreateAsset>, args: CreateAssetArgs) -> Result<()> {
    let config = config(ctx.program_id);
    let accounts = &ctx.accounts;
    let collection = load_optional::<Collection>(accounts.collection.as_ref(), &config)?;
    let owner = accounts
        .owner
        .as_ref()
        .map_or(*accounts.payer.key, |owner| *owner.key);

    let created = processor::create_asset(
        accounts.authority.key,
        *accounts.asset.key,
        owner,
        collection.as_ref(),
        args,
        &RemainingOracles(ctx.remaining_accounts),
    )?;

    let len = to_usize(created.asset.encoded_len()?)?;
    create_account(
        &accounts.asset,
        &accounts.payer,
        &accounts.system_program,
        len,
        &config,
    )?;
    store(
        &accounts.asset,
        &created.asset,
        &accounts.payer,
        &accounts.system_program,
        &config,
    )?;

    if let (Some(info), Some(next)) = (accounts.collection.as_ref(), created.collection.as_ref()) {
        store(info, next, &accounts.payer, &accounts.system_program, &config)?;
    }
    Ok(())
}

pub fn create_collection(ctx: Context<CreateCollection>, args: CreateCollectionArgs) -> Result<()> {
    let config = config(ctx.program_id);
    let accounts = &ctx.accounts;
    let collection = processor::create_collection(
        accounts.authority.key,
        *accounts.collection.key,
        args,
    )?;

    let len = to_usize(collection.encoded_len()?)?;
    create_account(
        &accounts.collection,
        &accounts.payer,
        &accounts.system_program,
        len,
        &config,
    )?;
    store(
        &accounts.collection,
        &collection,
        &accounts.payer,
        &accounts.system_program,
        &config,
    )
}
