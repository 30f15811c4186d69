pub mod data_section;
pub mod delegates;
pub mod external;
pub mod lifecycle;
pub mod metadata;
pub mod oracle;
pub mod royalties;

pub use data_section::*;
pub use delegates::*;
pub use external::*;
pub use lifecycle::*;
pub use metadata::*;
pub use oracle::*;
pub use royalties::*;

use anchor_lang::prelude::*;

use crate::state::Authority;

/// Internal plugin, one variant per kind.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum Plugin {
    Royalties(Royalties),
    FreezeDelegate(FreezeDelegate),
    BurnDelegate(BurnDelegate),
    TransferDelegate(TransferDelegate),
    UpdateDelegate(UpdateDelegate),
    PermanentFreezeDelegate(PermanentFreezeDelegate),
    Attributes(Attributes),
    PermanentTransferDelegate(PermanentTransferDelegate),
    PermanentBurnDelegate(PermanentBurnDelegate),
    Edition(Edition),
    MasterEdition(MasterEdition),
    ImmutableMetadata(ImmutableMetadata),
    Bubblegum(Bubblegum),
}

impl Plugin {
    pub fn plugin_type(&self) -> PluginType {
        match self {
            Plugin::Royalties(_) => PluginType::Royalties,
            Plugin::FreezeDelegate(_) => PluginType::FreezeDelegate,
            Plugin::BurnDelegate(_) => PluginType::BurnDelegate,
            Plugin::TransferDelegate(_) => PluginType::TransferDelegate,
            Plugin::UpdateDelegate(_) => PluginType::UpdateDelegate,
            Plugin::PermanentFreezeDelegate(_) => PluginType::PermanentFreezeDelegate,
            Plugin::Attributes(_) => PluginType::Attributes,
            Plugin::PermanentTransferDelegate(_) => PluginType::PermanentTransferDelegate,
            Plugin::PermanentBurnDelegate(_) => PluginType::PermanentBurnDelegate,
            Plugin::Edition(_) => PluginType::Edition,
            Plugin::MasterEdition(_) => PluginType::MasterEdition,
            Plugin::ImmutableMetadata(_) => PluginType::ImmutableMetadata,
            Plugin::Bubblegum(_) => PluginType::Bubblegum,
        }
    }

    /// Kind-specific data validation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Plugin::Royalties(royalties) => royalties.validate(),
            _ => Ok(()),
        }
    }

    /// Whether the plugin's data currently freezes the asset.
    pub fn is_frozen(&self) -> bool {
        match self {
            Plugin::FreezeDelegate(freeze) => freeze.frozen,
            Plugin::PermanentFreezeDelegate(freeze) => freeze.frozen,
            _ => false,
        }
    }
}

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum PluginType {
    Royalties,
    FreezeDelegate,
    BurnDelegate,
    TransferDelegate,
    UpdateDelegate,
    PermanentFreezeDelegate,
    Attributes,
    PermanentTransferDelegate,
    PermanentBurnDelegate,
    Edition,
    MasterEdition,
    ImmutableMetadata,
    Bubblegum,
}

impl PluginType {
    /// Delegates the owner grants; asset-local and reset on transfer.
    pub fn is_owner_managed(self) -> bool {
        matches!(
            self,
            PluginType::FreezeDelegate | PluginType::BurnDelegate | PluginType::TransferDelegate
        )
    }

    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            PluginType::PermanentFreezeDelegate
                | PluginType::PermanentTransferDelegate
                | PluginType::PermanentBurnDelegate
        )
    }

    /// Kinds that may only be supplied when the entity is created.
    pub fn is_creation_only(self) -> bool {
        self.is_permanent()
            || matches!(
                self,
                PluginType::Edition | PluginType::MasterEdition | PluginType::Bubblegum
            )
    }

    /// Authority a fresh or revoked record falls back to.
    pub fn manager(self) -> Authority {
        if self.is_owner_managed() {
            Authority::Owner
        } else {
            Authority::UpdateAuthority
        }
    }

    pub fn allowed_on_asset(self) -> bool {
        !matches!(self, PluginType::MasterEdition | PluginType::Bubblegum)
    }

    pub fn allowed_on_collection(self) -> bool {
        matches!(
            self,
            PluginType::PermanentFreezeDelegate
                | PluginType::PermanentTransferDelegate
                | PluginType::PermanentBurnDelegate
                | PluginType::UpdateDelegate
                | PluginType::Royalties
                | PluginType::MasterEdition
                | PluginType::ImmutableMetadata
                | PluginType::Bubblegum
                | PluginType::Attributes
        )
    }

    /// Collection kinds visible on member assets.
    pub fn is_inherited(self) -> bool {
        self.is_permanent()
            || matches!(
                self,
                PluginType::Royalties
                    | PluginType::MasterEdition
                    | PluginType::ImmutableMetadata
                    | PluginType::Bubblegum
            )
    }
}

/// A plugin paired with the authority allowed to update or remove it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PluginRecord {
    pub authority: Authority,
    pub plugin: Plugin,
}

impl PluginRecord {
    pub fn plugin_type(&self) -> PluginType {
        self.plugin.plugin_type()
    }
}

/// Instruction-side plugin: the authority falls back to the kind's manager.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PluginAuthorityPair {
    pub plugin: Plugin,
    pub authority: Option<Authority>,
}

impl PluginAuthorityPair {
    pub fn new(plugin: Plugin) -> Self {
        Self {
            plugin,
            authority: None,
        }
    }

    pub fn with_authority(plugin: Plugin, authority: Authority) -> Self {
        Self {
            plugin,
            authority: Some(authority),
        }
    }

    pub fn into_record(self) -> PluginRecord {
        let authority = self
            .authority
            .unwrap_or_else(|| self.plugin.plugin_type().manager());
        PluginRecord {
            authority,
            plugin: self.plugin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_follow_kind() {
        assert_eq!(PluginType::FreezeDelegate.manager(), Authority::Owner);
        assert_eq!(PluginType::PermanentFreezeDelegate.manager(), Authority::UpdateAuthority);
        assert_eq!(
            PluginAuthorityPair::new(Plugin::BurnDelegate(BurnDelegate {}))
                .into_record()
                .authority,
            Authority::Owner
        );
    }

    #[test]
    fn collection_allow_list() {
        assert!(PluginType::Royalties.allowed_on_collection());
        assert!(!PluginType::FreezeDelegate.allowed_on_collection());
        assert!(!PluginType::Edition.allowed_on_collection());
        assert!(!PluginType::MasterEdition.allowed_on_asset());
    }

    #[test]
    fn owner_managed_kinds_are_never_inherited() {
        for kind in [
            PluginType::FreezeDelegate,
            PluginType::BurnDelegate,
            PluginType::TransferDelegate,
        ] {
            assert!(!kind.is_inherited());
        }
        assert!(PluginType::PermanentBurnDelegate.is_inherited());
    }
}
