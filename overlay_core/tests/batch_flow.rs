//! Integration test: select tokens -> locate state -> resolve -> batch write
//!
//! Drives the full engine against the in-memory scene provider, mixing the
//! three storage conventions, operator defenses, a missing target, and the
//! bounded history.

use overlay_core::prelude::*;
use overlay_core::provider::mock::MockSceneProvider;
use overlay_core::provider::EntityKind;
use serde_json::json;

fn bag(value: serde_json::Value) -> AttributeBag {
    value.as_object().cloned().expect("test bag must be an object")
}

fn build_scene() -> MockSceneProvider {
    let provider = MockSceneProvider::new();

    // Flat-prefixed convention
    provider.insert(SceneEntity::token(
        "knight",
        "Knight",
        bag(json!({
            "com.battle-system.gmg/hp": 30,
            "com.battle-system.gmg/maxHp": 30,
            "com.battle-system.gmg/name": "Ser Aldric"
        })),
    ));

    // Named third-party tracker convention
    provider.insert(SceneEntity::token(
        "wolf",
        "Wolf",
        bag(json!({
            "com.bitperfect-software.hp-tracker/data": { "hp": 8 }
        })),
    ));

    // Nested-object convention
    provider.insert(SceneEntity::token(
        "witch",
        "Witch",
        bag(json!({
            "com.example.sheet/stats": { "currentHp": 5, "maxHp": 20 }
        })),
    ));

    // A prop with no tracker state at all
    provider.insert(SceneEntity::token("barrel", "Barrel", AttributeBag::new()));

    // Health bar attached to the knight
    provider.insert(SceneEntity::attachment("knight-bar", "hp", EntityKind::Shape, "knight"));

    provider
}

fn parsed(provider: &MockSceneProvider, id: &str) -> VitalState {
    let entity = provider.entity(&id.into()).expect("entity exists");
    parse(&entity.attributes).expect("entity has tracker state")
}

#[tokio::test]
async fn full_batch_flow_across_conventions() {
    let provider = build_scene();
    let mut defenses = DefenseStore::new();
    defenses.set_flat_armor(&"knight".into(), 5);
    defenses.set_multiplier(&"knight".into(), DamageType::Fire, 0.5);
    let mut history = HistoryLog::new();
    let config = OverlayConfig::default();

    let targets: Vec<EntityId> =
        vec!["knight".into(), "wolf".into(), "witch".into(), "barrel".into(), "ghost".into()];

    let report =
        apply_damage(&provider, &defenses, &mut history, &config, &targets, 20, DamageType::Fire)
            .await;

    // barrel has no tracker state, ghost is not in the scene
    assert_eq!(report.success, 3);
    assert_eq!(report.failed, 2);
    assert!(report.errors.contains(&BatchFailure::TargetMissing("ghost".into())));
    assert!(report.errors.contains(&BatchFailure::StateNotFound("Barrel".to_string())));

    // knight: floor(20 * 0.5) - 5 = 5 damage
    assert_eq!(parsed(&provider, "knight").hp, 25);
    // wolf: no profile, full 20 damage against 8 hp
    let wolf = parsed(&provider, "wolf");
    assert_eq!(wolf.hp, 0);
    assert_eq!(wolf.max_hp, 8);
    // witch: 20 damage against 5 hp, nested convention preserved
    assert_eq!(parsed(&provider, "witch").hp, 0);
    let witch = provider.entity(&"witch".into()).unwrap();
    assert_eq!(witch.attributes["com.example.sheet/stats"]["currentHp"], json!(0));

    // One history record per resolved target, newest first
    assert_eq!(history.len(), 3);
    let knight_record = history
        .records()
        .find(|r| r.target_id == "knight".into())
        .unwrap();
    assert_eq!(knight_record.target_name, "Ser Aldric");
    assert_eq!(knight_record.final_damage, 5);
    assert_eq!(knight_record.hp_before, 30);
    assert_eq!(knight_record.hp_after, 25);

    // Cosmetic sync resized the knight's bar: 146 * 25/30
    let bar = provider.entity(&"knight-bar".into()).unwrap();
    assert_eq!(bar.width, Some((146.0_f64 * 25.0 / 30.0).round()));
}

#[tokio::test]
async fn repeated_batches_accumulate_and_kill() {
    let provider = build_scene();
    let defenses = DefenseStore::new();
    let mut history = HistoryLog::new();
    let config = OverlayConfig::default();
    let targets: Vec<EntityId> = vec!["witch".into()];

    let first =
        apply_damage(&provider, &defenses, &mut history, &config, &targets, 3, DamageType::Slashing)
            .await;
    assert_eq!(first.success, 1);
    assert_eq!(parsed(&provider, "witch").hp, 2);

    let second =
        apply_damage(&provider, &defenses, &mut history, &config, &targets, 9, DamageType::Slashing)
            .await;
    assert_eq!(second.success, 1);
    assert_eq!(parsed(&provider, "witch").hp, 0);

    let latest = history.latest().unwrap();
    assert_eq!(latest.overkill, 7);
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn pure_damage_ignores_operator_defenses_end_to_end() {
    let provider = build_scene();
    let mut defenses = DefenseStore::new();
    defenses.set_flat_armor(&"knight".into(), 100);
    defenses.set_multiplier(&"knight".into(), DamageType::Pure, 0.0);
    let mut history = HistoryLog::new();
    let config = OverlayConfig::default();

    apply_damage(
        &provider,
        &defenses,
        &mut history,
        &config,
        &["knight".into()],
        12,
        DamageType::Pure,
    )
    .await;

    assert_eq!(parsed(&provider, "knight").hp, 18);
    assert_eq!(history.latest().unwrap().final_damage, 12);
}

#[tokio::test]
async fn change_events_fire_on_batch_write() {
    let provider = build_scene();
    let mut events = provider.subscribe();
    let defenses = DefenseStore::new();
    let mut history = HistoryLog::new();
    let config = OverlayConfig::default();

    apply_damage(
        &provider,
        &defenses,
        &mut history,
        &config,
        &["wolf".into()],
        1,
        DamageType::Slashing,
    )
    .await;

    let mut saw_change = false;
    while let Ok(event) = events.try_recv() {
        if let SceneEvent::EntitiesChanged(ids) = event {
            if ids.contains(&"wolf".into()) {
                saw_change = true;
            }
        }
    }
    assert!(saw_change);
}
