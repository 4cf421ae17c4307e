//! Prelude module for convenient imports
//!
//! ```rust
//! use overlay_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AttributeBag, CombinedView, EntityId, VitalState};

// Damage system
pub use crate::damage::{
    multiplier_label, resolve, resolve_batch, DamageInstruction, DamageResolution, DamageType,
};

// State location
pub use crate::locator::{detect, parse, write_health, Convention};

// Defense and history stores
pub use crate::defense::{DefenseProfile, DefenseStore};
pub use crate::history::{HistoryLog, HistoryRecord};

// Batch application
pub use crate::batch::{apply_damage, BatchFailure, BatchReport};

// Provider seam
pub use crate::provider::{SceneEntity, SceneEvent, SceneStateProvider};

// Config
pub use crate::config::OverlayConfig;
