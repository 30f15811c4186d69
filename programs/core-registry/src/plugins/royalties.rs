use anchor_lang::prelude::*;

use crate::constants::{MAX_BASIS_POINTS, TOTAL_CREATOR_PERCENTAGE};
use crate::errors::RegistryError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Creator {
    pub address: Pubkey,
    pub percentage: u8,
}

/// Programs allowed or denied to move royalty-bearing assets.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RuleSet {
    None,
    ProgramAllowList(Vec<Pubkey>),
    ProgramDenyList(Vec<Pubkey>),
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Royalties {
    pub basis_points: u16,
    pub creators: Vec<Creator>,
    pub rule_set: RuleSet,
}

impl Royalties {
    /// Basis points within range, creator shares summing to 100, no creator
    /// listed twice.
    pub fn validate(&self) -> Result<()> {
        require!(
            self.basis_points <= MAX_BASIS_POINTS,
            RegistryError::InvalidRoyalties
        );

        let mut total: u16 = 0;
        for (i, creator) in self.creators.iter().enumerate() {
            require!(
                !self.creators[..i]
                    .iter()
                    .any(|other| other.address == creator.address),
                RegistryError::InvalidRoyalties
            );
            total = total
                .checked_add(u16::from(creator.percentage))
                .ok_or(RegistryError::NumericalOverflow)?;
        }
        require!(
            total == TOTAL_CREATOR_PERCENTAGE,
            RegistryError::InvalidRoyalties
        );
        Ok(())
    }
}
