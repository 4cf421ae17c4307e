//! Operator-authored defense profiles
//!
//! Profiles live apart from the foreign scene data: the locator owns what the
//! map says about an entity, this store owns what the operator says about it.
//! The two are merged read-only into a [`CombinedView`](crate::types::CombinedView)
//! before resolution.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::damage::DamageType;
use crate::types::EntityId;

/// Defensive stats for one entity.
///
/// Sparse by invariant: a multiplier of 1 ("normal") and a type armor of 0
/// are never stored; removing an entry is equivalent to setting the neutral
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseProfile {
    /// Flat armor subtracted from any non-pure damage
    pub flat_armor: u32,
    /// Additional flat armor per damage type
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub armor_by_type: HashMap<DamageType, u32>,
    /// Resistance multipliers per damage type
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub multipliers: HashMap<DamageType, f64>,
    pub last_modified: DateTime<Utc>,
}

impl Default for DefenseProfile {
    fn default() -> Self {
        DefenseProfile {
            flat_armor: 0,
            armor_by_type: HashMap::new(),
            multipliers: HashMap::new(),
            last_modified: Utc::now(),
        }
    }
}

impl DefenseProfile {
    /// Resistance multiplier for a type, `1.0` when unset
    pub fn multiplier(&self, damage_type: DamageType) -> f64 {
        self.multipliers.get(&damage_type).copied().unwrap_or(1.0)
    }

    /// Type-specific armor, `0` when unset
    pub fn type_armor(&self, damage_type: DamageType) -> u32 {
        self.armor_by_type.get(&damage_type).copied().unwrap_or(0)
    }
}

/// Session store of defense profiles keyed by entity id.
///
/// Explicitly owned and injected into the engine's entry points; persistence
/// of the serialized form is the host's concern and treated as a black box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefenseStore {
    profiles: HashMap<EntityId, DefenseProfile>,
}

impl DefenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_id: &EntityId) -> Option<&DefenseProfile> {
        self.profiles.get(entity_id)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile for an entity, created lazily on first edit
    fn profile_mut(&mut self, entity_id: &EntityId) -> &mut DefenseProfile {
        let profile = self.profiles.entry(entity_id.clone()).or_default();
        profile.last_modified = Utc::now();
        profile
    }

    pub fn set_flat_armor(&mut self, entity_id: &EntityId, value: u32) {
        self.profile_mut(entity_id).flat_armor = value;
    }

    /// Set type-specific armor; zero removes the entry
    pub fn set_type_armor(&mut self, entity_id: &EntityId, damage_type: DamageType, value: u32) {
        let profile = self.profile_mut(entity_id);
        if value == 0 {
            profile.armor_by_type.remove(&damage_type);
        } else {
            profile.armor_by_type.insert(damage_type, value);
        }
    }

    pub fn remove_type_armor(&mut self, entity_id: &EntityId, damage_type: DamageType) {
        if let Some(profile) = self.profiles.get_mut(entity_id) {
            profile.armor_by_type.remove(&damage_type);
            profile.last_modified = Utc::now();
        }
    }

    /// Set a resistance multiplier; the neutral value 1 removes the entry,
    /// since absence is what "normal" means
    pub fn set_multiplier(&mut self, entity_id: &EntityId, damage_type: DamageType, value: f64) {
        let profile = self.profile_mut(entity_id);
        if value == 1.0 {
            profile.multipliers.remove(&damage_type);
        } else {
            profile.multipliers.insert(damage_type, value);
        }
    }

    pub fn remove_multiplier(&mut self, entity_id: &EntityId, damage_type: DamageType) {
        if let Some(profile) = self.profiles.get_mut(entity_id) {
            profile.multipliers.remove(&damage_type);
            profile.last_modified = Utc::now();
        }
    }

    /// Drop everything the operator recorded for one entity
    pub fn clear_entity(&mut self, entity_id: &EntityId) {
        self.profiles.remove(entity_id);
    }

    /// Serialized snapshot for the host's opaque persistence
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> EntityId {
        "token-1".into()
    }

    #[test]
    fn test_lazy_creation_on_first_edit() {
        let mut store = DefenseStore::new();
        assert!(store.get(&id()).is_none());

        store.set_flat_armor(&id(), 5);
        assert_eq!(store.get(&id()).unwrap().flat_armor, 5);
    }

    #[test]
    fn test_neutral_multiplier_is_never_stored() {
        let mut store = DefenseStore::new();
        store.set_multiplier(&id(), DamageType::Fire, 1.0);

        let profile = store.get(&id()).unwrap();
        assert!(profile.multipliers.is_empty());
        assert_eq!(profile.multiplier(DamageType::Fire), 1.0);
    }

    #[test]
    fn test_removing_multiplier_equals_never_set() {
        let mut store = DefenseStore::new();
        store.set_multiplier(&id(), DamageType::Fire, 0.5);
        assert_eq!(store.get(&id()).unwrap().multiplier(DamageType::Fire), 0.5);

        store.remove_multiplier(&id(), DamageType::Fire);
        assert_eq!(store.get(&id()).unwrap().multiplier(DamageType::Fire), 1.0);

        // Overwriting with the neutral value removes as well
        store.set_multiplier(&id(), DamageType::Fire, 2.0);
        store.set_multiplier(&id(), DamageType::Fire, 1.0);
        assert!(store.get(&id()).unwrap().multipliers.is_empty());
    }

    #[test]
    fn test_zero_type_armor_removes_entry() {
        let mut store = DefenseStore::new();
        store.set_type_armor(&id(), DamageType::Slashing, 4);
        assert_eq!(store.get(&id()).unwrap().type_armor(DamageType::Slashing), 4);

        store.set_type_armor(&id(), DamageType::Slashing, 0);
        assert!(store.get(&id()).unwrap().armor_by_type.is_empty());
    }

    #[test]
    fn test_clear_entity() {
        let mut store = DefenseStore::new();
        store.set_flat_armor(&id(), 3);
        store.set_multiplier(&id(), DamageType::Void, 0.0);

        store.clear_entity(&id());
        assert!(store.get(&id()).is_none());
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut store = DefenseStore::new();
        store.set_flat_armor(&id(), 7);
        store.set_multiplier(&id(), DamageType::Fire, 0.25);
        store.set_type_armor(&id(), DamageType::Piercing, 2);

        let restored = DefenseStore::from_json(&store.to_json().unwrap()).unwrap();
        let profile = restored.get(&id()).unwrap();
        assert_eq!(profile.flat_armor, 7);
        assert_eq!(profile.multiplier(DamageType::Fire), 0.25);
        assert_eq!(profile.type_armor(DamageType::Piercing), 2);
    }
}
