mod common;

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use common::{expect_err, in_collection, test_asset, test_collection};
use core_registry::errors::RegistryError;
use core_registry::plugins::{
    ExternalAdapterInitInfo, ExternalAdapterKey, ExternalAdapterUpdateInfo, ExternalCheckResult,
    ExternalPluginAdapter, ExternalValidationResult, LifecycleEvent, NoOracles, Oracle,
    OracleValidation, ValidationResultsOffset,
};
use core_registry::processor::{
    add_collection_external_adapter, add_external_adapter, burn, create_asset, transfer,
    update_external_adapter, CreateAssetArgs,
};
use core_registry::state::AssetAccount;

fn oracle(
    base_address: Pubkey,
    checks: Vec<(LifecycleEvent, ExternalCheckResult)>,
) -> ExternalAdapterInitInfo {
    let mut info = ExternalAdapterInitInfo::new(ExternalPluginAdapter::Oracle(Oracle {
        base_address,
        results_offset: ValidationResultsOffset::Anchor,
    }));
    info.lifecycle_checks = Some(checks);
    info
}

fn rejects_transfer() -> Vec<(LifecycleEvent, ExternalCheckResult)> {
    vec![(LifecycleEvent::Transfer, ExternalCheckResult::can_reject())]
}

/// Oracle account data behind an 8-byte discriminator.
fn published(
    base_address: Pubkey,
    transfer: ExternalValidationResult,
) -> BTreeMap<Pubkey, Vec<u8>> {
    let mut data = vec![0u8; 8];
    data.extend(
        OracleValidation::V1 {
            create: ExternalValidationResult::Pass,
            transfer,
            burn: ExternalValidationResult::Rejected,
            update: ExternalValidationResult::Pass,
        }
        .try_to_vec()
        .unwrap(),
    );
    BTreeMap::from([(base_address, data)])
}

fn standalone() -> (Pubkey, Pubkey, AssetAccount) {
    let owner = Pubkey::new_unique();
    let update_authority = Pubkey::new_unique();
    let mut args = CreateAssetArgs::new("Test Asset", "https://example.com/asset");
    args.update_authority = Some(update_authority);
    let asset = create_asset(
        &update_authority,
        Pubkey::new_unique(),
        owner,
        None,
        args,
        &NoOracles,
    )
    .unwrap()
    .asset;
    (owner, update_authority, asset)
}

#[test]
fn oracle_checks_are_validated_on_add() {
    let (_, update_authority, asset) = standalone();
    let base = Pubkey::new_unique();

    expect_err(
        add_external_adapter(&update_authority, &asset, None, oracle(base, vec![])),
        RegistryError::RequiresLifecycleCheck,
    );
    expect_err(
        add_external_adapter(
            &update_authority,
            &asset,
            None,
            ExternalAdapterInitInfo::new(ExternalPluginAdapter::Oracle(Oracle {
                base_address: base,
                results_offset: ValidationResultsOffset::NoOffset,
            })),
        ),
        RegistryError::RequiresLifecycleCheck,
    );
    expect_err(
        add_external_adapter(
            &update_authority,
            &asset,
            None,
            oracle(
                base,
                vec![(LifecycleEvent::Transfer, ExternalCheckResult::can_approve())],
            ),
        ),
        RegistryError::OracleCanRejectOnly,
    );
    expect_err(
        add_external_adapter(
            &update_authority,
            &asset,
            None,
            oracle(
                base,
                vec![(
                    LifecycleEvent::Burn,
                    ExternalCheckResult::can_reject().with(ExternalCheckResult::can_listen()),
                )],
            ),
        ),
        RegistryError::OracleCanRejectOnly,
    );

    let asset =
        add_external_adapter(&update_authority, &asset, None, oracle(base, rejects_transfer()))
            .unwrap();
    assert!(asset
        .plugins()
        .adapter(&ExternalAdapterKey::Oracle(base))
        .is_some());
}

#[test]
fn oracle_checks_are_validated_on_create() {
    let update_authority = Pubkey::new_unique();
    let base = Pubkey::new_unique();

    for (checks, expected) in [
        (vec![], RegistryError::RequiresLifecycleCheck),
        (
            vec![(LifecycleEvent::Create, ExternalCheckResult::can_approve())],
            RegistryError::OracleCanRejectOnly,
        ),
    ] {
        let mut args = CreateAssetArgs::new("Test Asset", "https://example.com/asset");
        args.update_authority = Some(update_authority);
        args.external_adapters = vec![oracle(base, checks)];
        expect_err(
            create_asset(
                &update_authority,
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                None,
                args,
                &NoOracles,
            ),
            expected,
        );
    }
}

#[test]
fn oracle_checks_are_validated_on_update() {
    let (_, update_authority, asset) = standalone();
    let base = Pubkey::new_unique();
    let key = ExternalAdapterKey::Oracle(base);
    let asset =
        add_external_adapter(&update_authority, &asset, None, oracle(base, rejects_transfer()))
            .unwrap();

    let update = |checks| ExternalAdapterUpdateInfo {
        lifecycle_checks: Some(checks),
        results_offset: None,
    };
    expect_err(
        update_external_adapter(&update_authority, &asset, None, key, update(vec![])),
        RegistryError::RequiresLifecycleCheck,
    );
    expect_err(
        update_external_adapter(
            &update_authority,
            &asset,
            None,
            key,
            update(vec![(LifecycleEvent::Update, ExternalCheckResult::can_listen())]),
        ),
        RegistryError::OracleCanRejectOnly,
    );

    let updated = update_external_adapter(
        &update_authority,
        &asset,
        None,
        key,
        update(vec![(LifecycleEvent::Burn, ExternalCheckResult::can_reject())]),
    )
    .unwrap();
    let record = updated.plugins().adapter_record(&key).unwrap();
    let checks = record.lifecycle_checks.unwrap();
    assert!(checks.get(LifecycleEvent::Burn).rejects());
    assert!(checks.get(LifecycleEvent::Transfer).is_empty());
}

#[test]
fn oracle_verdict_gates_transfer() {
    let (owner, update_authority, asset) = standalone();
    let base = Pubkey::new_unique();
    let asset =
        add_external_adapter(&update_authority, &asset, None, oracle(base, rejects_transfer()))
            .unwrap();
    let buyer = Pubkey::new_unique();

    expect_err(
        transfer(
            &owner,
            &asset,
            None,
            buyer,
            &published(base, ExternalValidationResult::Rejected),
        ),
        RegistryError::ExternalRejected,
    );
    expect_err(
        transfer(&owner, &asset, None, buyer, &NoOracles),
        RegistryError::MissingOracleAccount,
    );

    let moved = transfer(
        &owner,
        &asset,
        None,
        buyer,
        &published(base, ExternalValidationResult::Pass),
    )
    .unwrap();
    assert_eq!(moved.base().owner, buyer);

    // Burn has no registered check, so the published rejection is ignored.
    burn(
        &buyer,
        &moved,
        None,
        &published(base, ExternalValidationResult::Pass),
    )
    .unwrap();
}

#[test]
fn collection_oracle_applies_to_members() {
    let f = in_collection(test_collection(), test_asset());
    let base = Pubkey::new_unique();
    let collection = add_collection_external_adapter(
        &f.update_authority,
        &f.collection,
        oracle(base, rejects_transfer()),
    )
    .unwrap();
    let buyer = Pubkey::new_unique();

    expect_err(
        transfer(
            &f.owner,
            &f.asset,
            Some(&collection),
            buyer,
            &published(base, ExternalValidationResult::Rejected),
        ),
        RegistryError::ExternalRejected,
    );
    let moved = transfer(
        &f.owner,
        &f.asset,
        Some(&collection),
        buyer,
        &published(base, ExternalValidationResult::Approved),
    )
    .unwrap();
    assert_eq!(moved.base().owner, buyer);
}
