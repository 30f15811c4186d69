pub mod account;
pub mod asset;
pub mod authority;
pub mod collection;
pub mod key;

pub use account::*;
pub use asset::*;
pub use authority::*;
pub use collection::*;
pub use key::*;

use anchor_lang::prelude::{AnchorDeserialize, AnchorSerialize};

/// Base record of an account kind that carries a plugin registry.
pub trait CoreEntity: AnchorSerialize + AnchorDeserialize + Clone {
    const KEY: Key;

    fn key(&self) -> Key;
}
