//! Core types shared across the overlay engine

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::damage::DamageType;
use crate::defense::DefenseProfile;

/// The schema-less key-value data attached to an entity by any extension.
///
/// The overlay has no control over what lives in here; the locator inspects
/// it heuristically and everything else treats it as opaque.
pub type AttributeBag = serde_json::Map<String, Value>;

/// Stable identifier for a combat participant on the shared map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical, convention-independent snapshot of one entity's combat stats.
///
/// Produced by the state locator on read; ephemeral. The source
/// representation inside the attribute bag stays owned by whichever foreign
/// extension wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalState {
    /// Current health
    pub hp: u32,
    /// Maximum health
    pub max_hp: u32,
    /// Temporary health
    pub temp_hp: u32,
    /// Current resource points; `None` when the source format has no pool
    pub mana: Option<u32>,
    /// Maximum resource points
    pub max_mana: Option<u32>,
    /// Flat armor as recorded by the source (informational only; the
    /// operator's defense profile is what the resolver consults)
    pub armor: u32,
    /// Display name recorded by the source, empty when absent
    pub name: String,
}

impl VitalState {
    /// Minimal state carrying only health values, everything else defaulted
    pub fn with_health(hp: u32, max_hp: u32) -> Self {
        VitalState {
            hp,
            max_hp,
            temp_hp: 0,
            mana: None,
            max_mana: None,
            armor: 0,
            name: String::new(),
        }
    }

    /// Clamp current health into `[0, max_hp]`
    pub fn clamped(mut self) -> Self {
        self.hp = self.hp.min(self.max_hp);
        self
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Health as a fraction of maximum, in `[0, 1]`
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            (self.hp as f64 / self.max_hp as f64).clamp(0.0, 1.0)
        }
    }
}

/// Read-only merge of one entity's tracked vitals and its operator-authored
/// defense profile, fed to the damage resolver.
///
/// The merge never writes back into either source; reconciliation of results
/// goes through the batch module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedView {
    pub entity_id: EntityId,
    pub name: String,

    pub hp: u32,
    pub max_hp: u32,
    pub temp_hp: u32,
    pub mana: Option<u32>,
    pub max_mana: Option<u32>,

    /// Flat armor from the defense profile (operator override, default 0)
    pub flat_armor: u32,
    /// Additional flat armor per damage type, sparse
    pub armor_by_type: HashMap<DamageType, u32>,
    /// Resistance multipliers per damage type, sparse; absence means normal
    pub multipliers: HashMap<DamageType, f64>,

    pub has_tracked_state: bool,
    pub has_defense_profile: bool,
}

impl CombinedView {
    /// Merge an entity's located vitals with its defense profile.
    ///
    /// `fallback_name` is the scene-level entity name, used when the tracked
    /// state carries no name of its own.
    pub fn compose(
        entity_id: EntityId,
        fallback_name: &str,
        vital: Option<&VitalState>,
        profile: Option<&DefenseProfile>,
    ) -> Self {
        let name = vital
            .filter(|v| !v.name.is_empty())
            .map(|v| v.name.clone())
            .unwrap_or_else(|| fallback_name.to_string());

        CombinedView {
            entity_id,
            name,
            hp: vital.map(|v| v.hp).unwrap_or(0),
            max_hp: vital.map(|v| v.max_hp).unwrap_or(0),
            temp_hp: vital.map(|v| v.temp_hp).unwrap_or(0),
            mana: vital.and_then(|v| v.mana),
            max_mana: vital.and_then(|v| v.max_mana),
            flat_armor: profile.map(|p| p.flat_armor).unwrap_or(0),
            armor_by_type: profile.map(|p| p.armor_by_type.clone()).unwrap_or_default(),
            multipliers: profile.map(|p| p.multipliers.clone()).unwrap_or_default(),
            has_tracked_state: vital.is_some(),
            has_defense_profile: profile.is_some(),
        }
    }

    /// Resistance multiplier for a damage type, `1.0` when unset
    pub fn multiplier(&self, damage_type: DamageType) -> f64 {
        self.multipliers.get(&damage_type).copied().unwrap_or(1.0)
    }

    /// Type-specific flat armor for a damage type, `0` when unset
    pub fn type_armor(&self, damage_type: DamageType) -> u32 {
        self.armor_by_type.get(&damage_type).copied().unwrap_or(0)
    }
}
