pub mod asset;
pub mod create;
pub mod external;
pub mod plugin;

pub use asset::*;
pub use create::*;
pub use external::*;
pub use plugin::*;

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, CreateAccount, Transfer};
use solana_program::entrypoint::MAX_PERMITTED_DATA_INCREASE;

use crate::constants::ProgramConfig;
use crate::errors::RegistryError;
use crate::events::RegistryResized;
use crate::plugins::OracleAccounts;
use crate::state::{CoreEntity, RegistryAccount};

/// Oracle accounts passed as remaining accounts.
pub(crate) struct RemainingOracles<'a, 'info>(pub &'a [AccountInfo<'info>]);

impl OracleAccounts for RemainingOracles<'_, '_> {
    fn oracle_data(&self, address: &Pubkey) -> Option<Vec<u8>> {
        let account = self.0.iter().find(|account| account.key == address)?;
        let data = account.try_borrow_data().ok()?;
        Some(data.to_vec())
    }
}

pub(crate) fn config(program_id: &Pubkey) -> ProgramConfig {
    ProgramConfig::new(*program_id, system_program::ID)
}

pub(crate) fn load<T: CoreEntity>(
    info: &AccountInfo,
    config: &ProgramConfig,
) -> Result<RegistryAccount<T>> {
    config.check_program_owner(info.owner)?;
    let data = info.try_borrow_data()?;
    RegistryAccount::from_bytes(*info.key, &data)
}

pub(crate) fn load_optional<T: CoreEntity>(
    info: Option<&UncheckedAccount>,
    config: &ProgramConfig,
) -> Result<Option<RegistryAccount<T>>> {
    info.map(|info| load(info, config)).transpose()
}

/// Allocate a program-owned account sized for `len` bytes.
pub(crate) fn create_account<'info>(
    target: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    len: usize,
    config: &ProgramConfig,
) -> Result<()> {
    config.check_system_program(system_program.key)?;
    let lamports = Rent::get()?.minimum_balance(len);
    system_program::create_account(
        CpiContext::new(
            system_program.clone(),
            CreateAccount {
                from: payer.clone(),
                to: target.clone(),
            },
        ),
        lamports,
        len as u64,
        &config.program_id,
    )
}

/// Write `account` back, reallocating to its new size. The payer covers
/// rent for growth and receives the excess when the account shrinks.
pub(crate) fn store<'info, T: CoreEntity>(
    info: &AccountInfo<'info>,
    account: &RegistryAccount<T>,
    payer: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    config: &ProgramConfig,
) -> Result<()> {
    config.check_system_program(system_program.key)?;
    let bytes = account.to_bytes()?;
    let old_len = info.data_len();
    let new_len = bytes.len();

    if new_len != old_len {
        require!(
            new_len.saturating_sub(old_len) <= MAX_PERMITTED_DATA_INCREASE,
            RegistryError::AccountGrowthTooLarge
        );
        let required = Rent::get()?.minimum_balance(new_len);
        let current = info.lamports();
        if required > current {
            system_program::transfer(
                CpiContext::new(
                    system_program.clone(),
                    Transfer {
                        from: payer.clone(),
                        to: info.clone(),
                    },
                ),
                required - current,
            )?;
        } else if current > required {
            let refund = current - required;
            let payer_lamports = payer
                .lamports()
                .checked_add(refund)
                .ok_or(RegistryError::NumericalOverflow)?;
            **info.try_borrow_mut_lamports()? = required;
            **payer.try_borrow_mut_lamports()? = payer_lamports;
        }

        info.realloc(new_len, false)?;
        msg!("Resized {} from {} to {} bytes", info.key, old_len, new_len);
        emit!(RegistryResized {
            account: *info.key,
            old_len: old_len as u64,
            new_len: new_len as u64,
        });
    }

    info.try_borrow_mut_data()?.copy_from_slice(&bytes);
    Ok(())
}

/// Drain `info` into `destination` and hand it back to the system program.
pub(crate) fn close<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let total = destination
        .lamports()
        .checked_add(info.lamports())
        .ok_or(RegistryError::NumericalOverflow)?;
    **destination.try_borrow_mut_lamports()? = total;
    **info.try_borrow_mut_lamports()? = 0;

    info.realloc(0, false)?;
    info.assign(&system_program::ID);
    Ok(())
}
