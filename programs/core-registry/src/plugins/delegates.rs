use anchor_lang::prelude::*;

/// Owner-managed freeze. While `frozen`, the asset cannot move or burn.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreezeDelegate {
    pub frozen: bool,
}

/// Owner-managed right to burn.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BurnDelegate {}

/// Owner-managed right to transfer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferDelegate {}

/// Freeze that survives transfers and cannot be added after creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PermanentFreezeDelegate {
    pub frozen: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PermanentTransferDelegate {}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PermanentBurnDelegate {}

/// Delegated update authority. The plugin's own authority is the primary
/// delegate; `additional_delegates` are equally privileged.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateDelegate {
    pub additional_delegates: Vec<Pubkey>,
}
