//! Best-effort cosmetic sync of health-bar attachments
//!
//! Some extensions draw a bar shape and an `"hp/max"` text label attached to
//! a token. After a primary write the engine tries to keep those visuals
//! proportional to the new health. A skip is an expected, frequent outcome
//! (most tokens have no indicator, or another extension redraws its own),
//! so the result is a plain enum and never surfaces to the operator.

use serde_json::Value;
use tracing::debug;

use crate::config::OverlayConfig;
use crate::provider::{EntityKind, SceneEntity, SceneStateProvider};
use crate::types::EntityId;

/// Metadata flags extensions use to mark an attachment as a health bar
const HEALTH_BAR_FLAGS: [&str; 2] = ["com.battle-system.gmg/isHealthBar", "isHealthBar"];

/// Outcome of a cosmetic sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// At least one indicator was updated
    Updated,
    /// No indicator found, or the update could not be applied; cosmetic only
    Skipped,
}

fn is_health_indicator(entity: &SceneEntity) -> bool {
    let flagged = HEALTH_BAR_FLAGS
        .iter()
        .any(|flag| entity.attributes.get(*flag).and_then(Value::as_bool).unwrap_or(false));
    let name = entity.name.to_lowercase();
    flagged
        || name.contains("health")
        || name.contains("hp")
        || entity.kind == EntityKind::Shape
}

/// Update health-bar width and label attachments for one entity.
///
/// Independent from the primary write; every failure path degrades to
/// [`SyncOutcome::Skipped`] without affecting the caller's report.
pub async fn sync_health_indicators<P: SceneStateProvider + ?Sized>(
    provider: &P,
    target: &EntityId,
    hp: u32,
    max_hp: u32,
    config: &OverlayConfig,
) -> SyncOutcome {
    if max_hp == 0 {
        return SyncOutcome::Skipped;
    }

    let all = match provider.get_all_entities().await {
        Ok(entities) => entities,
        Err(err) => {
            debug!(target = %target, %err, "indicator scan failed");
            return SyncOutcome::Skipped;
        }
    };

    let indicator_ids: Vec<EntityId> = all
        .iter()
        .filter(|e| e.attached_to.as_ref() == Some(target) && is_health_indicator(e))
        .map(|e| e.id.clone())
        .collect();

    if indicator_ids.is_empty() {
        debug!(target = %target, "no health indicators attached");
        return SyncOutcome::Skipped;
    }

    let fraction = (hp as f64 / max_hp as f64).clamp(0.0, 1.0);
    let bar_width = (config.health_bar_max_width * fraction).round();
    let label = format!("{hp}/{max_hp}");

    let result = provider
        .update_entities(&indicator_ids, &move |entity| {
            match entity.kind {
                EntityKind::Shape => entity.width = Some(bar_width),
                EntityKind::Text => entity.label = Some(label.clone()),
                EntityKind::Token => {}
            }
            entity
                .attributes
                .insert("healthPercent".to_string(), Value::from(fraction));
        })
        .await;

    match result {
        Ok(()) => SyncOutcome::Updated,
        Err(err) => {
            debug!(target = %target, %err, "indicator update failed");
            SyncOutcome::Skipped
        }
    }
}
