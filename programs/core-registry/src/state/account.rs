use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::registry::{PluginHeader, PluginSet};
use crate::state::{Asset, Collection, CoreEntity};
use crate::utils::{decode_prefix, encoded_len, write};

/// A decoded account: its address, base record and plugin registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryAccount<T: CoreEntity> {
    address: Pubkey,
    base: T,
    plugins: PluginSet,
}

pub type AssetAccount = RegistryAccount<Asset>;
pub type CollectionAccount = RegistryAccount<Collection>;

impl<T: CoreEntity> RegistryAccount<T> {
    pub fn new(address: Pubkey, base: T) -> Result<Self> {
        require!(base.key() == T::KEY, RegistryError::DeserializationError);
        let start = Self::records_start(&base)?;
        Ok(Self {
            address,
            base,
            plugins: PluginSet::new(start),
        })
    }

    fn records_start(base: &T) -> Result<u64> {
        encoded_len(base)?
            .checked_add(PluginHeader::LEN)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginSet {
        &mut self.plugins
    }

    /// Mutate the base record; every plugin record moves with its new size.
    pub fn update_base(&mut self, update: impl FnOnce(&mut T) -> Result<()>) -> Result<()> {
        update(&mut self.base)?;
        require!(self.base.key() == T::KEY, RegistryError::InvalidAccountKey);
        let start = Self::records_start(&self.base)?;
        self.plugins.rebase(start)
    }

    /// Total account size once encoded.
    pub fn encoded_len(&self) -> Result<u64> {
        encoded_len(&self.base)?
            .checked_add(self.plugins.encoded_len()?)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        write(&self.base, &mut out)?;
        self.plugins.encode(&mut out)?;
        Ok(out)
    }

    pub fn from_bytes(address: Pubkey, data: &[u8]) -> Result<Self> {
        let (base, base_len) = decode_prefix::<T>(data)?;
        require!(base.key() == T::KEY, RegistryError::InvalidAccountKey);
        let plugins = PluginSet::decode(data, base_len)?;
        Ok(Self {
            address,
            base,
            plugins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{Creator, Plugin, PluginRecord, Royalties, RuleSet};
    use crate::state::{Authority, UpdateAuthority};

    fn asset() -> AssetAccount {
        AssetAccount::new(
            Pubkey::new_unique(),
            Asset::new(
                Pubkey::new_unique(),
                UpdateAuthority::Address(Pubkey::new_unique()),
                "Test Asset".into(),
                "https://example.com/asset".into(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn base_layout_puts_records_after_header() {
        let asset = asset();
        assert_eq!(asset.to_bytes().unwrap().len(), 110);
        assert_eq!(asset.plugins().layout().start(), 119);
    }

    #[test]
    fn renaming_moves_every_record() {
        let mut asset = asset();
        asset
            .plugins_mut()
            .add_plugin(PluginRecord {
                authority: Authority::UpdateAuthority,
                plugin: Plugin::Royalties(Royalties {
                    basis_points: 100,
                    creators: vec![Creator {
                        address: Pubkey::new_unique(),
                        percentage: 100,
                    }],
                    rule_set: RuleSet::None,
                }),
            })
            .unwrap();

        asset
            .update_base(|base| {
                base.name = "A much longer asset name".into();
                Ok(())
            })
            .unwrap();
        assert_eq!(asset.plugins().layout().start(), 119 + 14);

        let bytes = asset.to_bytes().unwrap();
        assert_eq!(bytes.len() as u64, asset.encoded_len().unwrap());
        let decoded = AssetAccount::from_bytes(asset.address(), &bytes).unwrap();
        assert_eq!(decoded, asset);
    }

    #[test]
    fn rejects_wrong_account_kind() {
        let collection = CollectionAccount::new(
            Pubkey::new_unique(),
            Collection::new(Pubkey::new_unique(), "C".into(), "u".into()),
        )
        .unwrap();
        let bytes = collection.to_bytes().unwrap();
        assert!(AssetAccount::from_bytes(Pubkey::new_unique(), &bytes).is_err());
        assert!(CollectionAccount::from_bytes(Pubkey::new_unique(), &bytes).is_ok());
    }
}
