use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::ExternalPluginAdapterType;

/// Events an adapter may register checks for.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum LifecycleEvent {
    Create,
    Transfer,
    Burn,
    Update,
}

/// Set of check kinds registered for one event, stored as bit flags.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExternalCheckResult {
    pub flags: u32,
}

impl ExternalCheckResult {
    pub const CAN_LISTEN: u32 = 1;
    pub const CAN_APPROVE: u32 = 1 << 1;
    pub const CAN_REJECT: u32 = 1 << 2;
    const ALL: u32 = Self::CAN_LISTEN | Self::CAN_APPROVE | Self::CAN_REJECT;

    pub fn none() -> Self {
        Self { flags: 0 }
    }

    pub fn can_listen() -> Self {
        Self {
            flags: Self::CAN_LISTEN,
        }
    }

    pub fn can_approve() -> Self {
        Self {
            flags: Self::CAN_APPROVE,
        }
    }

    pub fn can_reject() -> Self {
        Self {
            flags: Self::CAN_REJECT,
        }
    }

    pub fn with(self, other: Self) -> Self {
        Self {
            flags: self.flags | other.flags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flags == 0
    }

    pub fn rejects(&self) -> bool {
        self.flags & Self::CAN_REJECT != 0
    }

    pub fn approves(&self) -> bool {
        self.flags & Self::CAN_APPROVE != 0
    }

    pub fn listens(&self) -> bool {
        self.flags & Self::CAN_LISTEN != 0
    }
}

/// Per-adapter map from lifecycle event to its registered checks.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleCheckTable {
    pub checks: BTreeMap<LifecycleEvent, ExternalCheckResult>,
}

impl LifecycleCheckTable {
    pub fn new(entries: impl IntoIterator<Item = (LifecycleEvent, ExternalCheckResult)>) -> Self {
        let mut checks = BTreeMap::new();
        for (event, result) in entries {
            let merged = checks
                .get(&event)
                .copied()
                .unwrap_or_else(ExternalCheckResult::none)
                .with(result);
            checks.insert(event, merged);
        }
        Self { checks }
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn get(&self, event: LifecycleEvent) -> ExternalCheckResult {
        self.checks.get(&event).copied().unwrap_or_default()
    }

    /// Enforce the per-kind rules:
    /// - oracles register `CanReject` and nothing else, for at least one event;
    /// - lifecycle hooks register at least one non-empty event;
    /// - data-only kinds register nothing.
    pub fn validate_for(
        table: Option<&LifecycleCheckTable>,
        adapter_type: ExternalPluginAdapterType,
    ) -> Result<()> {
        match adapter_type {
            ExternalPluginAdapterType::Oracle => {
                let table = table.ok_or(RegistryError::RequiresLifecycleCheck)?;
                require!(!table.is_empty(), RegistryError::RequiresLifecycleCheck);
                for result in table.checks.values() {
                    require!(
                        result.flags == ExternalCheckResult::CAN_REJECT,
                        RegistryError::OracleCanRejectOnly
                    );
                }
                Ok(())
            }
            ExternalPluginAdapterType::LifecycleHook => {
                let table = table.ok_or(RegistryError::RequiresLifecycleCheck)?;
                require!(!table.is_empty(), RegistryError::RequiresLifecycleCheck);
                for result in table.checks.values() {
                    require!(!result.is_empty(), RegistryError::RequiresLifecycleCheck);
                    require!(
                        result.flags & !ExternalCheckResult::ALL == 0,
                        RegistryError::LifecycleChecksNotAllowed
                    );
                }
                Ok(())
            }
            ExternalPluginAdapterType::AppData
            | ExternalPluginAdapterType::LinkedAppData
            | ExternalPluginAdapterType::DataSection => {
                require!(
                    table.map_or(true, LifecycleCheckTable::is_empty),
                    RegistryError::LifecycleChecksNotAllowed
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::test_utils::expect_err;

    #[test]
    fn oracle_requires_checks() {
        let empty = LifecycleCheckTable::default();
        expect_err(
            LifecycleCheckTable::validate_for(Some(&empty), ExternalPluginAdapterType::Oracle),
            RegistryError::RequiresLifecycleCheck,
        );
        expect_err(
            LifecycleCheckTable::validate_for(None, ExternalPluginAdapterType::Oracle),
            RegistryError::RequiresLifecycleCheck,
        );
    }

    #[test]
    fn oracle_can_reject_only() {
        let approve = LifecycleCheckTable::new([(
            LifecycleEvent::Transfer,
            ExternalCheckResult::can_approve(),
        )]);
        expect_err(
            LifecycleCheckTable::validate_for(Some(&approve), ExternalPluginAdapterType::Oracle),
            RegistryError::OracleCanRejectOnly,
        );

        let mixed = LifecycleCheckTable::new([
            (LifecycleEvent::Transfer, ExternalCheckResult::can_reject()),
            (LifecycleEvent::Burn, ExternalCheckResult::can_listen()),
        ]);
        expect_err(
            LifecycleCheckTable::validate_for(Some(&mixed), ExternalPluginAdapterType::Oracle),
            RegistryError::OracleCanRejectOnly,
        );

        let reject = LifecycleCheckTable::new([(
            LifecycleEvent::Transfer,
            ExternalCheckResult::can_reject(),
        )]);
        LifecycleCheckTable::validate_for(Some(&reject), ExternalPluginAdapterType::Oracle)
            .unwrap();
    }

    #[test]
    fn hooks_accept_any_check_kind() {
        let table = LifecycleCheckTable::new([
            (LifecycleEvent::Create, ExternalCheckResult::can_listen()),
            (
                LifecycleEvent::Transfer,
                ExternalCheckResult::can_approve().with(ExternalCheckResult::can_reject()),
            ),
        ]);
        LifecycleCheckTable::validate_for(Some(&table), ExternalPluginAdapterType::LifecycleHook)
            .unwrap();

        let empty_event =
            LifecycleCheckTable::new([(LifecycleEvent::Burn, ExternalCheckResult::none())]);
        assert!(LifecycleCheckTable::validate_for(
            Some(&empty_event),
            ExternalPluginAdapterType::LifecycleHook
        )
        .is_err());
    }

    #[test]
    fn data_kinds_take_no_checks() {
        LifecycleCheckTable::validate_for(None, ExternalPluginAdapterType::AppData).unwrap();
        let table =
            LifecycleCheckTable::new([(LifecycleEvent::Create, ExternalCheckResult::can_listen())]);
        expect_err(
            LifecycleCheckTable::validate_for(Some(&table), ExternalPluginAdapterType::AppData),
            RegistryError::LifecycleChecksNotAllowed,
        );
    }

    #[test]
    fn repeated_events_merge() {
        let table = LifecycleCheckTable::new([
            (LifecycleEvent::Update, ExternalCheckResult::can_listen()),
            (LifecycleEvent::Update, ExternalCheckResult::can_reject()),
        ]);
        let result = table.get(LifecycleEvent::Update);
        assert!(result.listens() && result.rejects() && !result.approves());
    }
}
