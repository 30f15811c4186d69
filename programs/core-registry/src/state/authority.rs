use anchor_lang::prelude::*;

/// Who may act on a plugin or adapter.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Authority {
    /// Nobody, not even the update authority.
    None,
    /// The asset's current owner.
    Owner,
    /// The asset's effective update authority.
    UpdateAuthority,
    /// One explicit key.
    Address { address: Pubkey },
}

impl Authority {
    pub fn address(address: Pubkey) -> Self {
        Authority::Address { address }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Authority::None)
    }
}

/// Update authority link stored on an asset.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateAuthority {
    None,
    Address(Pubkey),
    Collection(Pubkey),
}

impl UpdateAuthority {
    /// The linked collection, if any.
    pub fn collection(&self) -> Option<Pubkey> {
        match self {
            UpdateAuthority::Collection(address) => Some(*address),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_sizes() {
        assert_eq!(Authority::None.try_to_vec().unwrap().len(), 1);
        assert_eq!(Authority::Owner.try_to_vec().unwrap().len(), 1);
        assert_eq!(
            Authority::address(Pubkey::new_unique()).try_to_vec().unwrap().len(),
            33
        );
        assert_eq!(UpdateAuthority::None.try_to_vec().unwrap().len(), 1);
        assert_eq!(
            UpdateAuthority::Collection(Pubkey::new_unique())
                .try_to_vec()
                .unwrap()
                .len(),
            33
        );
    }
}
