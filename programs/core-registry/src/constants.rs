use anchor_lang::prelude::*;

use crate::errors::RegistryError;

/// Upper bound for royalty basis points (100%).
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Royalty creator shares must sum to this.
pub const TOTAL_CREATOR_PERCENTAGE: u16 = 100;

/// Collaborator keys the registry validates against.
///
/// Passed explicitly to handlers and fetchers instead of being read from
/// globals, so callers (and tests) can substitute their own deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Program that owns every asset and collection account.
    pub program_id: Pubkey,
    /// Program used to create accounts and move rent.
    pub system_program: Pubkey,
}

impl ProgramConfig {
    pub fn new(program_id: Pubkey, system_program: Pubkey) -> Self {
        Self {
            program_id,
            system_program,
        }
    }

    pub fn check_program_owner(&self, owner: &Pubkey) -> Result<()> {
        require_keys_eq!(*owner, self.program_id, RegistryError::InvalidProgramOwner);
        Ok(())
    }

    /// The account passed as system program must be the configured one.
    pub fn check_system_program(&self, key: &Pubkey) -> Result<()> {
        require_keys_eq!(*key, self.system_program, RegistryError::InvalidSystemProgram);
        Ok(())
    }
}
