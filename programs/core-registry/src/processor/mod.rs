//! Mutations on decoded accounts.
//!
//! Every operation takes the accounts it reads by reference and returns new
//! states. Nothing is written back on error, so a rejected mutation leaves the
//! stored accounts untouched.

pub mod asset;
pub mod create;
pub mod external;
pub mod plugin;

pub use asset::*;
pub use create::*;
pub use external::*;
pub use plugin::*;

use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{
    ExternalPluginAdapter, ExternalPluginAdapterType, ExternalValidationResult, LifecycleEvent,
    OracleAccounts, PluginType,
};
use crate::registry::ExternalAdapterRecord;
use crate::resolver::{
    has_collection_update_authority, has_update_authority, linked_collection, satisfies,
    satisfies_on_collection,
};
use crate::state::{AssetAccount, Authority, CollectionAccount};

/// The account a signer is acting on, with whatever context its
/// authorities resolve against.
#[derive(Clone, Copy)]
pub(crate) enum Gate<'a> {
    Asset {
        asset: &'a AssetAccount,
        collection: Option<&'a CollectionAccount>,
    },
    Collection(&'a CollectionAccount),
}

impl<'a> Gate<'a> {
    /// Checks the supplied collection against the asset's link.
    pub(crate) fn asset(
        asset: &'a AssetAccount,
        collection: Option<&'a CollectionAccount>,
    ) -> Result<Self> {
        let collection = linked_collection(asset.base(), collection)?;
        Ok(Gate::Asset { asset, collection })
    }

    pub(crate) fn collection(collection: &'a CollectionAccount) -> Self {
        Gate::Collection(collection)
    }

    pub(crate) fn is_update_authority(&self, candidate: &Pubkey) -> Result<bool> {
        match self {
            Gate::Asset { asset, collection } => {
                has_update_authority(candidate, asset, *collection)
            }
            Gate::Collection(collection) => {
                Ok(has_collection_update_authority(candidate, collection))
            }
        }
    }

    pub(crate) fn satisfies(&self, candidate: &Pubkey, authority: &Authority) -> Result<bool> {
        match (self, authority) {
            (Gate::Asset { .. }, Authority::UpdateAuthority) => self.is_update_authority(candidate),
            (Gate::Asset { asset, collection }, _) => {
                satisfies(candidate, authority, asset.base(), *collection)
            }
            (Gate::Collection(collection), _) => {
                Ok(satisfies_on_collection(candidate, authority, collection))
            }
        }
    }

    /// Whether `candidate` is the party that manages `kind` here: the owner
    /// for owner-managed delegates, the update authority otherwise.
    pub(crate) fn manages(&self, candidate: &Pubkey, kind: PluginType) -> Result<bool> {
        if kind.is_owner_managed() {
            self.satisfies(candidate, &Authority::Owner)
        } else {
            self.is_update_authority(candidate)
        }
    }

    pub(crate) fn allows_plugin(&self, kind: PluginType) -> bool {
        match self {
            Gate::Asset { .. } => kind.allowed_on_asset(),
            Gate::Collection(_) => kind.allowed_on_collection(),
        }
    }

    /// Data sections are only ever created by writes. Linked app data is
    /// declared once on a collection and materialized per asset.
    pub(crate) fn allows_adapter(&self, adapter_type: ExternalPluginAdapterType) -> bool {
        match adapter_type {
            ExternalPluginAdapterType::DataSection => false,
            ExternalPluginAdapterType::LinkedAppData => matches!(self, Gate::Collection(_)),
            ExternalPluginAdapterType::LifecycleHook
            | ExternalPluginAdapterType::Oracle
            | ExternalPluginAdapterType::AppData => true,
        }
    }
}

/// Consult every oracle that registered `CanReject` for `event`.
pub(crate) fn check_oracles<'r>(
    adapters: impl IntoIterator<Item = &'r ExternalAdapterRecord>,
    event: LifecycleEvent,
    oracles: &dyn OracleAccounts,
) -> Result<()> {
    for record in adapters {
        let ExternalPluginAdapter::Oracle(oracle) = record.adapter else {
            continue;
        };
        let rejects = record
            .lifecycle_checks
            .as_ref()
            .map_or(false, |checks| checks.get(event).rejects());
        if !rejects {
            continue;
        }

        let data = oracles
            .oracle_data(&oracle.base_address)
            .ok_or(RegistryError::MissingOracleAccount)?;
        if oracle.validate(event, &data)? == ExternalValidationResult::Rejected {
            msg!("Oracle {} rejected {:?}", oracle.base_address, event);
            return err!(RegistryError::ExternalRejected);
        }
    }
    Ok(())
}
