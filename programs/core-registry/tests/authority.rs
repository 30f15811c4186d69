mod common;

use anchor_lang::prelude::*;
use common::{expect_err, in_collection, test_asset, test_collection};
use core_registry::errors::RegistryError;
use core_registry::plugins::{
    FreezeDelegate, NoOracles, PermanentFreezeDelegate, Plugin, PluginAuthorityPair, PluginType,
    UpdateDelegate,
};
use core_registry::processor::{
    add_collection_plugin, add_plugin, approve_plugin_authority, create_asset,
    revoke_plugin_authority, transfer, update_plugin, CreateAssetArgs,
};
use core_registry::resolver::satisfies;
use core_registry::state::{Asset, AssetAccount, Authority, UpdateAuthority};
use core_registry::view::{DerivedAssetView, RecordSource};

fn delegate_authorities(delegate: Pubkey) -> [Authority; 4] {
    [
        Authority::None,
        Authority::Owner,
        Authority::UpdateAuthority,
        Authority::address(delegate),
    ]
}

#[test]
fn update_authority_closure_through_collection() {
    let delegate = Pubkey::new_unique();
    let stranger = Pubkey::new_unique();

    for delegate_authority in delegate_authorities(delegate) {
        let f = in_collection(test_collection(), test_asset());
        let collection = add_collection_plugin(
            &f.update_authority,
            &f.collection,
            PluginAuthorityPair::with_authority(
                Plugin::UpdateDelegate(UpdateDelegate::default()),
                delegate_authority,
            ),
        )
        .unwrap();
        let asset = f.asset.base();

        let check = |candidate: &Pubkey| {
            satisfies(
                candidate,
                &Authority::UpdateAuthority,
                asset,
                Some(&collection),
            )
            .unwrap()
        };
        assert!(check(&f.update_authority), "{delegate_authority:?}");
        assert_eq!(
            check(&f.owner),
            delegate_authority == Authority::Owner,
            "{delegate_authority:?}"
        );
        assert_eq!(
            check(&delegate),
            delegate_authority == Authority::address(delegate),
            "{delegate_authority:?}"
        );
        assert!(!check(&stranger), "{delegate_authority:?}");

        // Resolution never guesses without the collection.
        expect_err(
            satisfies(&f.update_authority, &Authority::UpdateAuthority, asset, None),
            RegistryError::MissingCollection,
        );
    }
}

#[test]
fn update_authority_closure_for_plain_address() {
    let delegate = Pubkey::new_unique();
    let stranger = Pubkey::new_unique();

    for delegate_authority in delegate_authorities(delegate) {
        let owner = Pubkey::new_unique();
        let update_authority = Pubkey::new_unique();
        let asset = AssetAccount::new(
            Pubkey::new_unique(),
            Asset::new(
                owner,
                UpdateAuthority::Address(update_authority),
                "Test Asset".into(),
                "https://example.com/asset".into(),
            ),
        )
        .unwrap();
        let asset = add_plugin(
            &update_authority,
            &asset,
            None,
            PluginAuthorityPair::with_authority(
                Plugin::UpdateDelegate(UpdateDelegate::default()),
                delegate_authority,
            ),
        )
        .unwrap();

        let check = |candidate: &Pubkey| {
            satisfies(candidate, &Authority::UpdateAuthority, asset.base(), None).unwrap()
        };
        assert!(check(&update_authority), "{delegate_authority:?}");
        // Asset-local delegates do not widen the update authority itself.
        assert!(!check(&owner), "{delegate_authority:?}");
        assert!(!check(&delegate), "{delegate_authority:?}");
        assert!(!check(&stranger), "{delegate_authority:?}");
    }
}

#[test]
fn collection_freeze_applies_until_asset_overrides() {
    let mut collection = test_collection();
    collection.plugins = vec![PluginAuthorityPair::new(Plugin::PermanentFreezeDelegate(
        PermanentFreezeDelegate { frozen: true },
    ))];
    let f = in_collection(collection, test_asset());

    let view = DerivedAssetView::derive(&f.asset, Some(&f.collection)).unwrap();
    assert!(view.is_frozen());
    expect_err(
        transfer(
            &f.owner,
            &f.asset,
            Some(&f.collection),
            Pubkey::new_unique(),
            &NoOracles,
        ),
        RegistryError::AssetFrozen,
    );

    let mut args = test_asset();
    args.plugins = vec![PluginAuthorityPair::new(Plugin::PermanentFreezeDelegate(
        PermanentFreezeDelegate { frozen: false },
    ))];
    let created = create_asset(
        &f.update_authority,
        Pubkey::new_unique(),
        f.owner,
        Some(&f.collection),
        args,
        &NoOracles,
    )
    .unwrap();
    let collection = created.collection.unwrap();

    let view = DerivedAssetView::derive(&created.asset, Some(&collection)).unwrap();
    let entries = view.plugins_of(PluginType::PermanentFreezeDelegate);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source, RecordSource::Asset);
    assert!(!entries[0].record.plugin.is_frozen());
    assert_eq!(entries[1].source, RecordSource::Collection);
    assert!(entries[1].record.plugin.is_frozen());
    assert!(!view.is_frozen());

    let buyer = Pubkey::new_unique();
    let moved = transfer(
        &f.owner,
        &created.asset,
        Some(&collection),
        buyer,
        &NoOracles,
    )
    .unwrap();
    assert_eq!(moved.base().owner, buyer);
}

#[test]
fn frozen_plugin_authority_cannot_be_reassigned() {
    let owner = Pubkey::new_unique();
    let update_authority = Pubkey::new_unique();
    let holder = Pubkey::new_unique();
    let mut args = CreateAssetArgs::new("Test Asset", "https://example.com/asset");
    args.update_authority = Some(update_authority);
    args.plugins = vec![
        PluginAuthorityPair::with_authority(
            Plugin::FreezeDelegate(FreezeDelegate { frozen: false }),
            Authority::address(holder),
        ),
        PluginAuthorityPair::new(Plugin::PermanentFreezeDelegate(PermanentFreezeDelegate {
            frozen: true,
        })),
    ];
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
    let asset = update_plugin(
        &holder,
        &asset,
        None,
        Plugin::FreezeDelegate(FreezeDelegate { frozen: true }),
    )
    .unwrap();

    for signer in [owner, update_authority, holder, Pubkey::new_unique()] {
        for kind in [PluginType::FreezeDelegate, PluginType::PermanentFreezeDelegate] {
            expect_err(
                approve_plugin_authority(&signer, &asset, None, kind, Authority::address(signer)),
                RegistryError::AssetFrozen,
            );
            expect_err(
                revoke_plugin_authority(&signer, &asset, None, kind),
                RegistryError::AssetFrozen,
            );
        }
    }

    // Thawing re-enables reassignment by the holder.
    let asset = update_plugin(
        &holder,
        &asset,
        None,
        Plugin::FreezeDelegate(FreezeDelegate { frozen: false }),
    )
    .unwrap();
    let asset = approve_plugin_authority(
        &holder,
        &asset,
        None,
        PluginType::FreezeDelegate,
        Authority::Owner,
    )
    .unwrap();
    assert_eq!(
        asset
            .plugins()
            .plugin(PluginType::FreezeDelegate)
            .unwrap()
            .authority,
        Authority::Owner
    );
}
