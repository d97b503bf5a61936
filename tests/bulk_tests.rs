//! Bulk mutation scenarios against the in-memory backend.

use std::sync::Arc;

use houseedge::adapter::outbound::memory::{MemoryCatalog, MemoryRuleStore};
use houseedge::application::{BulkMutationEngine, BulkSettings};
use houseedge::domain::{
    CatalogId, Criterion, GameType, GameVariant, RuleCriteria, RuleForm,
};
use houseedge::error::{BulkError, Error};
use houseedge::port::RuleDurabilityStore;
use houseedge::testkit::config::eager_yield;
use houseedge::testkit::domain::{form, game, games, rule};
use houseedge::testkit::store::FlakyRuleStore;
use rust_decimal_macros::dec;
use tokio::sync::watch;

fn engine(catalog_size: usize) -> (BulkMutationEngine, Arc<MemoryRuleStore>, Arc<MemoryCatalog>) {
    let durable = Arc::new(MemoryRuleStore::new());
    let catalog = Arc::new(MemoryCatalog::new(games(catalog_size)));
    let engine = BulkMutationEngine::new(durable.clone(), catalog.clone(), BulkSettings::default());
    (engine, durable, catalog)
}

fn slot_classic() -> RuleForm {
    form("slot", "classic", "5", "1", "100")
}

#[tokio::test]
async fn apply_to_all_creates_one_rule_per_catalog_game() {
    let (mut engine, durable, _) = engine(3);

    let outcome = engine.apply_to_all_games(&slot_classic()).await.unwrap();

    assert_eq!(outcome.inserted(), 3);
    assert_eq!(outcome.already_covered, 0);
    let codes: Vec<&str> = engine.rules().iter().map(|r| r.game_id.as_str()).collect();
    assert_eq!(codes, vec!["g1", "g2", "g3"]);
    for rule in engine.rules() {
        assert_eq!(rule.house_edge.to_string(), "0.0500");
        assert!(rule.is_active);
        assert_eq!(rule.min_bet, Some(dec!(1)));
        assert_eq!(rule.max_bet, Some(dec!(100)));
        assert_eq!(rule.game_type, GameType::Slot);
        assert_eq!(rule.game_variant, GameVariant::Classic);
    }
    assert_eq!(durable.list().await.unwrap(), engine.rules().to_vec());
}

#[tokio::test]
async fn apply_to_all_wire_shape_uses_decimal_strings() {
    let (mut engine, _, _) = engine(1);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();

    let json = serde_json::to_value(&engine.rules()[0]).unwrap();
    assert_eq!(json["house_edge"], "0.0500");
    assert_eq!(json["min_bet"], "1");
    assert_eq!(json["max_bet"], "100");
    assert_eq!(json["game_type"], "slot");
    assert_eq!(json["is_active"], true);
}

#[tokio::test]
async fn apply_to_all_is_additive() {
    let (mut engine, _, _) = engine(4);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();

    let second = engine.apply_to_all_games(&slot_classic()).await.unwrap();

    assert_eq!(second.inserted(), 4);
    assert_eq!(second.already_covered, 4);
    assert_eq!(engine.rules().len(), 8);
}

#[tokio::test]
async fn apply_to_all_sees_catalog_changes() {
    let (mut engine, _, catalog) = engine(2);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();
    catalog.push(game("late"));

    let outcome = engine
        .apply_to_all_games(&form("live", "real", "1.5", "5", ""))
        .await
        .unwrap();

    assert_eq!(outcome.inserted(), 3);
    assert_eq!(outcome.already_covered, 0);
}

#[tokio::test]
async fn bulk_create_shares_template_with_distinct_ids() {
    let (mut engine, _, _) = engine(5);
    let targets = engine
        .resolve_selection(&[
            CatalogId::new("id-g2"),
            CatalogId::new("id-g4"),
            CatalogId::new("id-g5"),
        ])
        .await
        .unwrap();

    let outcome = engine
        .create_bulk(&targets, &form("crash", "v2", "0.03", "0.1", "50"))
        .await
        .unwrap();

    assert_eq!(outcome.inserted(), 3);
    let mut ids = outcome.rule_ids.clone();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    let first = &engine.rules()[0];
    for rule in engine.rules() {
        assert_eq!(rule.house_edge, dec!(0.0300));
        assert_eq!(rule.effective_from, first.effective_from);
        assert_eq!(rule.effective_until, first.effective_until);
        assert_eq!(rule.game_name.as_deref(), Some(format!("Game {}", rule.game_id).as_str()));
    }
}

#[tokio::test]
async fn invalid_bulk_form_reports_every_field_and_writes_nothing() {
    let (mut engine, durable, _) = engine(3);

    let err = engine
        .apply_to_all_games(&form("", "", "", "", ""))
        .await
        .unwrap_err();

    match err {
        Error::Bulk(BulkError::Invalid(errors)) => {
            assert!(errors.contains("game_type"));
            assert!(errors.contains("house_edge"));
            assert!(errors.contains("min_bet"));
            assert!(!errors.contains("game_variant"));
        }
        other => panic!("expected field errors, got {other}"),
    }
    assert!(engine.rules().is_empty());
    assert!(durable.is_empty());
}

#[tokio::test]
async fn inverted_bet_bounds_are_rejected() {
    let (mut engine, _, _) = engine(2);

    let err = engine
        .apply_to_all_games(&form("slot", "classic", "5", "100", "1"))
        .await
        .unwrap_err();

    match err {
        Error::Bulk(BulkError::Invalid(errors)) => assert!(errors.contains("max_bet")),
        other => panic!("expected field errors, got {other}"),
    }
}

#[tokio::test]
async fn wildcard_removal_requires_exact_count_and_wipes_everything() {
    let (mut engine, durable, _) = engine(3);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();
    engine
        .apply_to_all_games(&form("live", "real", "2", "1", "10"))
        .await
        .unwrap();

    let preview = engine.preview_removal(RuleCriteria::any());
    assert!(preview.wipes_all());
    assert_eq!(preview.count(), 6);
    assert!(preview.describe().contains("ALL 6 rules"));

    assert!(matches!(
        preview.clone().confirm(5),
        Err(BulkError::ConfirmationMismatch { given: 5, expected: 6 })
    ));

    let removed = engine
        .remove_all_matching(preview.confirm(6).unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 6);
    assert!(engine.rules().is_empty());
    assert!(durable.is_empty());
}

#[tokio::test]
async fn filtered_removal_keeps_non_matching_rules() {
    let (mut engine, _, _) = engine(2);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();
    engine
        .apply_to_all_games(&form("slot", "mobile", "4", "1", "10"))
        .await
        .unwrap();
    engine
        .apply_to_all_games(&form("plinko", "classic", "1", "1", "10"))
        .await
        .unwrap();

    let criteria = RuleCriteria {
        game_type: Criterion::Exactly(GameType::Slot),
        game_variant: Criterion::Any,
    };
    let preview = engine.preview_removal(criteria);
    let count = preview.count();
    let removed = engine
        .remove_all_matching(preview.confirm(count).unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 4);
    assert_eq!(engine.rules().len(), 2);
    assert!(engine
        .rules()
        .iter()
        .all(|r| r.game_type == GameType::Plinko));
}

#[tokio::test]
async fn removal_with_no_matches_is_a_no_op() {
    let (mut engine, _, _) = engine(2);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();

    let preview = engine.preview_removal(RuleCriteria::exactly(GameType::Wheel, GameVariant::Demo));
    let removed = engine
        .remove_all_matching(preview.confirm(0).unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 0);
    assert_eq!(engine.rules().len(), 2);
}

#[tokio::test]
async fn edit_reexpresses_percent_as_fraction() {
    let (mut engine, _, _) = engine(1);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();
    let id = engine.rules()[0].id.clone();
    let created_at = engine.rules()[0].created_at;

    let edited = engine
        .update_rule(&id, &form("slot", "classic", "12", "1", "100"))
        .await
        .unwrap();

    assert_eq!(edited.house_edge.to_string(), "0.1200");
    assert_eq!(edited.house_edge_display(), "12.00%");
    assert_eq!(edited.id, id);
    assert_eq!(edited.created_at, created_at);
    assert_eq!(engine.rules()[0].house_edge, dec!(0.12));
}

#[tokio::test]
async fn edit_of_percent_keeps_status_bounds_and_window() {
    let (mut engine, durable, _) = engine(1);
    let selection = engine
        .resolve_selection(&[CatalogId::from("id-g1")])
        .await
        .unwrap();
    let created = engine
        .create_single(
            selection.first(),
            &RuleForm {
                effective_from: Some("2030-01-01T00:00".into()),
                effective_until: Some("2030-06-01T00:00".into()),
                ..slot_classic()
            },
        )
        .await
        .unwrap();
    engine.toggle_status(&created.id).await.unwrap();

    let edited = engine
        .update_rule(
            &created.id,
            &RuleForm {
                house_edge: "12".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.house_edge.to_string(), "0.1200");
    assert!(!edited.is_active);
    assert_eq!(edited.min_bet, Some(dec!(1)));
    assert_eq!(edited.max_bet, Some(dec!(100)));
    assert_eq!(edited.effective_from, created.effective_from);
    assert_eq!(edited.effective_until, created.effective_until);
    assert_eq!(edited.game_type, GameType::Slot);
    assert_eq!(edited.game_variant, GameVariant::Classic);
    assert_eq!(durable.snapshot()[0], edited);
}

#[tokio::test]
async fn toggle_and_delete_round_trip_through_the_store() {
    let (mut engine, durable, _) = engine(2);
    engine.apply_to_all_games(&slot_classic()).await.unwrap();
    let id = engine.rules()[1].id.clone();

    let toggled = engine.toggle_status(&id).await.unwrap();
    assert!(!toggled.is_active);
    assert!(!durable.snapshot()[1].is_active);

    engine.delete_rule(&id).await.unwrap();
    assert_eq!(engine.rules().len(), 1);
    assert_eq!(durable.len(), 1);

    let err = engine.delete_rule(&id).await.unwrap_err();
    assert!(matches!(err, Error::Bulk(BulkError::RuleNotFound(_))));
}

#[tokio::test]
async fn durable_failure_leaves_session_store_unchanged() {
    let durable = Arc::new(FlakyRuleStore::new());
    let catalog = Arc::new(MemoryCatalog::new(games(3)));
    let mut engine = BulkMutationEngine::new(durable.clone(), catalog, BulkSettings::default());
    engine.apply_to_all_games(&slot_classic()).await.unwrap();

    durable.fail_writes(true);
    assert!(engine.apply_to_all_games(&slot_classic()).await.is_err());
    assert_eq!(engine.rules().len(), 3);

    let preview = engine.preview_removal(RuleCriteria::any());
    assert!(engine
        .remove_all_matching(preview.confirm(3).unwrap())
        .await
        .is_err());
    assert_eq!(engine.rules().len(), 3);

    let id = engine.rules()[0].id.clone();
    assert!(engine.toggle_status(&id).await.is_err());
    assert!(engine.rules()[0].is_active);

    assert_eq!(durable.rejected(), 3);
    assert_eq!(durable.inner().len(), 3);
}

#[tokio::test]
async fn cancellation_aborts_before_commit_and_rearms() {
    let (tx, rx) = watch::channel(false);
    let durable = Arc::new(MemoryRuleStore::new());
    let catalog = Arc::new(MemoryCatalog::new(games(10)));
    let mut engine =
        BulkMutationEngine::new(durable.clone(), catalog, eager_yield()).with_cancel_signal(rx);

    tx.send(true).unwrap();
    let err = engine.apply_to_all_games(&slot_classic()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Bulk(BulkError::Cancelled { total: 10, .. })
    ));
    assert!(engine.rules().is_empty());
    assert!(durable.is_empty());

    tx.send(false).unwrap();
    let outcome = engine.apply_to_all_games(&slot_classic()).await.unwrap();
    assert_eq!(outcome.inserted(), 10);
}

#[tokio::test]
async fn load_replaces_session_with_durable_contents() {
    let (mut seeded, durable, catalog) = engine(2);
    seeded.apply_to_all_games(&slot_classic()).await.unwrap();

    let mut fresh = BulkMutationEngine::new(durable.clone(), catalog, BulkSettings::default());
    assert_eq!(fresh.load().await.unwrap(), 2);
    assert_eq!(fresh.rules(), seeded.rules());
}

#[tokio::test]
async fn load_keeps_rules_with_inverted_bounds_and_allows_fixing_them() {
    let mut legacy = rule("g1", GameType::Slot, GameVariant::Classic);
    legacy.min_bet = Some(dec!(500));
    legacy.max_bet = Some(dec!(10));
    let ok = rule("g2", GameType::Live, GameVariant::Real);
    let durable = Arc::new(MemoryRuleStore::with_rules(vec![legacy.clone(), ok]));
    let catalog = Arc::new(MemoryCatalog::new(games(2)));
    let mut engine = BulkMutationEngine::new(durable.clone(), catalog, BulkSettings::default());

    assert_eq!(engine.load().await.unwrap(), 2);
    assert_eq!(engine.invalid_rules(), 1);

    let toggled = engine.toggle_status(&legacy.id).await.unwrap();
    assert!(!toggled.is_active);

    let err = engine
        .update_rule(
            &legacy.id,
            &RuleForm {
                house_edge: "3".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    match err {
        Error::Bulk(BulkError::Invalid(errors)) => assert!(errors.contains("max_bet")),
        other => panic!("expected invalid form, got {other:?}"),
    }

    engine
        .update_rule(
            &legacy.id,
            &RuleForm {
                max_bet: "1000".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(engine.invalid_rules(), 0);
    assert_eq!(durable.snapshot()[0].max_bet, Some(dec!(1000)));
}

#[tokio::test]
async fn create_single_requires_a_resolved_game() {
    let (mut engine, _, _) = engine(1);
    let selection = engine.resolve_selection(&[]).await.unwrap();

    let err = engine
        .create_single(selection.first(), &slot_classic())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Bulk(BulkError::MissingGame)));
}
