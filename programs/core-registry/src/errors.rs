use anchor_lang::prelude::*;

#[error_code]
pub enum RegistryError {
    #[msg("Signer does not hold the required authority")]
    InvalidAuthority,

    #[msg("Operation requires the asset's collection")]
    MissingCollection,

    #[msg("Collection does not match the asset's collection link")]
    CollectionMismatch,

    #[msg("Record of this kind already exists")]
    DuplicateRecord,

    #[msg("Record is immutable")]
    ImmutableRecord,

    #[msg("Adapter requires at least one lifecycle check")]
    RequiresLifecycleCheck,

    #[msg("Oracle adapters may only register CanReject")]
    OracleCanRejectOnly,

    #[msg("Payload does not match the declared schema")]
    DataTypeMismatch,

    #[msg("Numerical overflow")]
    NumericalOverflow,

    #[msg("Registry records are not packed")]
    LayoutInvariant,

    #[msg("Asset is frozen")]
    AssetFrozen,

    #[msg("Plugin not found")]
    PluginNotFound,

    #[msg("Plugin kind is not allowed on this account")]
    InvalidPluginTarget,

    #[msg("Adapter kind does not accept lifecycle checks")]
    LifecycleChecksNotAllowed,

    #[msg("Adapter carries no data section")]
    NoDataSection,

    #[msg("Invalid royalties configuration")]
    InvalidRoyalties,

    #[msg("Rejected by external oracle")]
    ExternalRejected,

    #[msg("Oracle account was not supplied")]
    MissingOracleAccount,

    #[msg("Account not found")]
    AccountNotFound,

    #[msg("Failed to deserialize account data")]
    DeserializationError,

    #[msg("Failed to serialize account data")]
    SerializationError,

    #[msg("Invalid account key")]
    InvalidAccountKey,

    #[msg("Account is not owned by the registry program")]
    InvalidProgramOwner,

    #[msg("Account cannot grow that much in one instruction")]
    AccountGrowthTooLarge,

    #[msg("System program account does not match the configured one")]
    InvalidSystemProgram,
}
