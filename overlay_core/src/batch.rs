//! Batch reconciler - apply one damage instruction across selected targets
//!
//! Validation happens before any write: targets that vanished or lost their
//! tracker state are counted as failed and excluded, then the remaining
//! valid subset is written through a single logical update call. The batch
//! is not atomic across targets; a rejected write partway through rolls
//! nothing back, it only shows up in the report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::OverlayConfig;
use crate::damage::{resolve, DamageInstruction, DamageResolution, DamageType};
use crate::defense::DefenseStore;
use crate::history::{HistoryLog, HistoryRecord};
use crate::locator;
use crate::provider::SceneStateProvider;
use crate::sync::sync_health_indicators;
use crate::types::{CombinedView, EntityId};

/// Per-target or whole-call failure inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BatchFailure {
    /// The entity id no longer resolves against the scene store
    #[error("target not found: {0}")]
    TargetMissing(EntityId),

    /// The entity exists but no recognized tracker state could be located
    #[error("no tracked state: {0}")]
    StateNotFound(String),

    /// The store rejected the whole update call. The engine cannot know
    /// which targets a non-atomic store partially applied, so the batch's
    /// success count is zeroed rather than guessed.
    #[error("scene update rejected: {0}")]
    WriteRejected(String),
}

/// Aggregate outcome of one batch apply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BatchFailure>,
}

impl BatchReport {
    fn fail(&mut self, error: BatchFailure) {
        self.failed += 1;
        self.errors.push(error);
    }
}

/// Resolve and apply damage to every selected target.
///
/// Appends one history record per *resolved* target; write failures surface
/// only through the returned report. An empty target set returns an empty
/// report without touching the scene store.
pub async fn apply_damage<P: SceneStateProvider + ?Sized>(
    provider: &P,
    defenses: &DefenseStore,
    history: &mut HistoryLog,
    config: &OverlayConfig,
    targets: &[EntityId],
    amount: u32,
    damage_type: DamageType,
) -> BatchReport {
    let mut report = BatchReport::default();
    if targets.is_empty() {
        return report;
    }

    let snapshot = match provider.get_entities(targets).await {
        Ok(entities) => entities,
        Err(err) => {
            report.failed = targets.len();
            report.errors.push(BatchFailure::WriteRejected(err.to_string()));
            return report;
        }
    };
    let by_id: HashMap<&EntityId, _> = snapshot.iter().map(|e| (&e.id, e)).collect();

    // Validate every target before any write is issued
    let instruction = DamageInstruction::new(amount, damage_type);
    let mut resolutions: Vec<DamageResolution> = Vec::new();
    for target in targets {
        let Some(entity) = by_id.get(target) else {
            report.fail(BatchFailure::TargetMissing(target.clone()));
            continue;
        };
        let Some(vital) = locator::parse(&entity.attributes) else {
            let label = if entity.name.is_empty() { target.to_string() } else { entity.name.clone() };
            report.fail(BatchFailure::StateNotFound(label));
            continue;
        };

        let view = CombinedView::compose(
            target.clone(),
            &entity.name,
            Some(&vital),
            defenses.get(target),
        );
        resolutions.push(resolve(&view, &instruction));
    }

    let mut write_applied = false;
    if !resolutions.is_empty() {
        let valid_ids: Vec<EntityId> = resolutions.iter().map(|r| r.entity_id.clone()).collect();
        let new_health: HashMap<EntityId, u32> = resolutions
            .iter()
            .map(|r| (r.entity_id.clone(), r.hp_after))
            .collect();

        let outcome = provider
            .update_entities(&valid_ids, &move |entity| {
                if let Some(new_hp) = new_health.get(&entity.id) {
                    // Re-detection inside the write keeps the entity's own
                    // storage convention; a state that vanished between
                    // validation and write is logged and left untouched.
                    if let Err(err) = locator::write_health(&mut entity.attributes, *new_hp, None) {
                        warn!(entity = %entity.id, %err, "state disappeared before write");
                    }
                }
            })
            .await;

        match outcome {
            Ok(()) => {
                report.success = valid_ids.len();
                write_applied = true;
            }
            Err(err) => {
                report.success = 0;
                report.failed += valid_ids.len();
                report.errors.push(BatchFailure::WriteRejected(err.to_string()));
            }
        }
    }

    // History reflects calculator intent, one record per resolved target,
    // regardless of how the write went
    for resolution in &resolutions {
        history.push(HistoryRecord::from_resolution(resolution));
    }

    // Cosmetic pass, silent either way
    if write_applied {
        for resolution in &resolutions {
            let outcome = sync_health_indicators(
                provider,
                &resolution.entity_id,
                resolution.hp_after,
                resolution.max_hp,
                config,
            )
            .await;
            debug!(entity = %resolution.entity_id, ?outcome, "indicator sync");
        }
    }

    report
}
