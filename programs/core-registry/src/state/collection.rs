use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::state::{CoreEntity, Key};

/// Base record of a collection account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    /// Always `Key::Collection`
    pub key: Key,
    /// Collections never chain to another collection.
    pub update_authority: Pubkey,
    pub name: String,
    pub uri: String,
    /// Assets ever created into the collection
    pub num_minted: u32,
    /// Assets currently linked to the collection
    pub current_size: u32,
}

impl Collection {
    pub fn new(update_authority: Pubkey, name: String, uri: String) -> Self {
        Self {
            key: Key::Collection,
            update_authority,
            name,
            uri,
            num_minted: 0,
            current_size: 0,
        }
    }

    pub fn increment(&mut self) -> Result<()> {
        self.num_minted = self
            .num_minted
            .checked_add(1)
            .ok_or(RegistryError::NumericalOverflow)?;
        self.join()
    }

    /// An existing asset moved into the collection.
    pub fn join(&mut self) -> Result<()> {
        self.current_size = self
            .current_size
            .checked_add(1)
            .ok_or(RegistryError::NumericalOverflow)?;
        Ok(())
    }

    /// An asset left the collection or was burned.
    pub fn leave(&mut self) -> Result<()> {
        self.current_size = self
            .current_size
            .checked_sub(1)
            .ok_or(RegistryError::NumericalOverflow)?;
        Ok(())
    }
}

impl CoreEntity for Collection {
    const KEY: Key = Key::Collection;

    fn key(&self) -> Key {
        self.key
    }
}
