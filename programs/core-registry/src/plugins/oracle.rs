use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::LifecycleEvent;

/// Where the validation results start inside the oracle account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationResultsOffset {
    NoOffset,
    /// Skip an 8-byte Anchor account discriminator.
    Anchor,
    Custom(u64),
}

impl ValidationResultsOffset {
    pub fn to_offset(self) -> u64 {
        match self {
            ValidationResultsOffset::NoOffset => 0,
            ValidationResultsOffset::Anchor => 8,
            ValidationResultsOffset::Custom(offset) => offset,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalValidationResult {
    Approved,
    Rejected,
    Pass,
}

/// Results an oracle account publishes, one per event.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleValidation {
    Uninitialized,
    V1 {
        create: ExternalValidationResult,
        transfer: ExternalValidationResult,
        burn: ExternalValidationResult,
        update: ExternalValidationResult,
    },
}

impl OracleValidation {
    pub fn result_for(&self, event: LifecycleEvent) -> Option<ExternalValidationResult> {
        match self {
            OracleValidation::Uninitialized => None,
            OracleValidation::V1 {
                create,
                transfer,
                burn,
                update,
            } => Some(match event {
                LifecycleEvent::Create => *create,
                LifecycleEvent::Transfer => *transfer,
                LifecycleEvent::Burn => *burn,
                LifecycleEvent::Update => *update,
            }),
        }
    }
}

/// External account that may veto lifecycle events.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Oracle {
    pub base_address: Pubkey,
    pub results_offset: ValidationResultsOffset,
}

impl Oracle {
    /// Read the oracle's verdict for `event` from its account data.
    pub fn validate(
        &self,
        event: LifecycleEvent,
        account_data: &[u8],
    ) -> Result<ExternalValidationResult> {
        let offset = usize::try_from(self.results_offset.to_offset())
            .map_err(|_| error!(RegistryError::NumericalOverflow))?;
        let mut results = account_data
            .get(offset..)
            .ok_or(RegistryError::DeserializationError)?;
        let validation = OracleValidation::deserialize(&mut results)
            .map_err(|_| error!(RegistryError::DeserializationError))?;

        validation
            .result_for(event)
            .ok_or_else(|| error!(RegistryError::DeserializationError))
    }
}

/// Source of oracle account data for the duration of one mutation.
pub trait OracleAccounts {
    fn oracle_data(&self, address: &Pubkey) -> Option<Vec<u8>>;
}

/// For callers whose entities carry no oracles.
pub struct NoOracles;

impl OracleAccounts for NoOracles {
    fn oracle_data(&self, _address: &Pubkey) -> Option<Vec<u8>> {
        None
    }
}

impl OracleAccounts for BTreeMap<Pubkey, Vec<u8>> {
    fn oracle_data(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.get(address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn published(transfer: ExternalValidationResult) -> Vec<u8> {
        OracleValidation::V1 {
            create: ExternalValidationResult::Pass,
            transfer,
            burn: ExternalValidationResult::Pass,
            update: ExternalValidationResult::Pass,
        }
        .try_to_vec()
        .unwrap()
    }

    #[test]
    fn reads_results_after_anchor_discriminator() {
        let oracle = Oracle {
            base_address: Pubkey::new_unique(),
            results_offset: ValidationResultsOffset::Anchor,
        };
        let mut data = vec![7u8; 8];
        data.extend(published(ExternalValidationResult::Rejected));

        assert_eq!(
            oracle.validate(LifecycleEvent::Transfer, &data).unwrap(),
            ExternalValidationResult::Rejected
        );
        assert_eq!(
            oracle.validate(LifecycleEvent::Burn, &data).unwrap(),
            ExternalValidationResult::Pass
        );
    }

    #[test]
    fn short_or_uninitialized_accounts_fail() {
        let oracle = Oracle {
            base_address: Pubkey::new_unique(),
            results_offset: ValidationResultsOffset::Custom(64),
        };
        assert!(oracle.validate(LifecycleEvent::Transfer, &[0u8; 8]).is_err());

        let oracle = Oracle {
            base_address: Pubkey::new_unique(),
            results_offset: ValidationResultsOffset::NoOffset,
        };
        assert!(oracle.validate(LifecycleEvent::Transfer, &[0u8]).is_err());
    }
}
