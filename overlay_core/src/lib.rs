//! overlay_core - Combat-assistant overlay engine for virtual tabletops
//!
//! This library provides:
//! - State Locator: heuristic discovery of health-tracker fields inside
//!   arbitrary, schema-less token attribute bags
//! - Damage Resolver: deterministic multi-stage damage pipeline
//!   (resistance multiplier, flat armor, type armor, floor at zero)
//! - Batch Reconciler: validated write-back of resolved health across a
//!   selection, with partial-failure reporting
//! - Defense profiles, bounded combat history, and best-effort health-bar
//!   sync around the core
//!
//! The host rendering SDK is reached only through the [`provider`] seam;
//! the engine owns no UI and installs no global state.

pub mod batch;
pub mod config;
pub mod damage;
pub mod defense;
pub mod history;
pub mod locator;
pub mod prelude;
pub mod provider;
pub mod sync;
pub mod types;

// Re-export core types for convenience
pub use batch::{apply_damage, BatchFailure, BatchReport};
pub use config::{ConfigError, OverlayConfig};
pub use damage::{
    multiplier_label, resolve, resolve_batch, DamageCategory, DamageInstruction,
    DamageResolution, DamageType, DamageTypeInfo, RESISTANCE_VALUES,
};
pub use defense::{DefenseProfile, DefenseStore};
pub use history::{HistoryLog, HistoryRecord};
pub use locator::Convention;
pub use provider::{
    EntityKind, ProviderError, SceneEntity, SceneEvent, SceneStateProvider,
};
pub use sync::{sync_health_indicators, SyncOutcome};
pub use types::{AttributeBag, CombinedView, EntityId, VitalState};
