//! Convention detection and state extraction

use serde_json::Value;
use tracing::debug;

use super::{
    value_as_string, value_as_u32, ARMOR_KEYS, HP_KEYS, HP_TRACKER_KEY, KNOWN_PREFIXES,
    MANA_KEYS, MAX_HP_KEYS, MAX_MANA_KEYS, NAME_KEYS, TEMP_HP_KEYS,
};
use crate::types::{AttributeBag, VitalState};

/// Which of the recognized encodings a bag uses for its tracker state.
///
/// Carried from detection to the write path so a write mutates the exact
/// convention the read found, never migrating an entity to another format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convention {
    /// The named third-party tracker object under [`HP_TRACKER_KEY`]
    HpTracker,
    /// Flat composite keys `"<prefix>/<field>"`
    FlatPrefixed { prefix: &'static str },
    /// A nested object under an arbitrary top-level key
    Nested { key: String },
}

/// Determine whether a bag encodes tracker state and in which convention.
///
/// `None` is the expected, common outcome for entities without a recognized
/// tracker, not an error.
pub fn detect(bag: &AttributeBag) -> Option<Convention> {
    if hp_tracker_object(bag).is_some() {
        debug!(convention = "hp-tracker", "located tracker state");
        return Some(Convention::HpTracker);
    }

    for prefix in KNOWN_PREFIXES {
        // A prefix only matches when it yields an actual health value, so
        // detection and extraction cannot disagree about a bag.
        if flat_value(bag, prefix, &HP_KEYS).and_then(value_as_u32).is_some() {
            debug!(convention = "flat", prefix, "located tracker state");
            return Some(Convention::FlatPrefixed { prefix });
        }
    }

    for (key, value) in bag {
        if let Some(obj) = value.as_object() {
            if nested_value(obj, &HP_KEYS).and_then(value_as_u32).is_some() {
                debug!(convention = "nested", key = key.as_str(), "located tracker state");
                return Some(Convention::Nested { key: key.clone() });
            }
        }
    }

    None
}

/// Extract vital state from a bag, if any recognized convention matches
pub fn parse(bag: &AttributeBag) -> Option<VitalState> {
    let convention = detect(bag)?;
    parse_with(bag, &convention)
}

/// Extract vital state through an already-detected convention.
///
/// Returns `None` when the bag no longer matches the convention, which the
/// write path treats as the state having disappeared between read and write.
pub fn parse_with(bag: &AttributeBag, convention: &Convention) -> Option<VitalState> {
    match convention {
        Convention::HpTracker => {
            let obj = hp_tracker_object(bag)?;
            let hp = value_as_u32(obj.get("hp")?)?;
            let max_hp = obj.get("maxHp").and_then(value_as_u32).unwrap_or(hp);
            // This tracker stores only hp and maxHp; no temp, resource, or
            // armor fields are ever produced for it.
            Some(VitalState::with_health(hp, max_hp))
        }
        Convention::FlatPrefixed { prefix } => {
            let hp = flat_value(bag, prefix, &HP_KEYS).and_then(value_as_u32)?;
            Some(VitalState {
                hp,
                max_hp: flat_value(bag, prefix, &MAX_HP_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(hp),
                temp_hp: flat_value(bag, prefix, &TEMP_HP_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(0),
                mana: flat_value(bag, prefix, &MANA_KEYS).and_then(value_as_u32),
                max_mana: flat_value(bag, prefix, &MAX_MANA_KEYS).and_then(value_as_u32),
                armor: flat_value(bag, prefix, &ARMOR_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(0),
                name: flat_value(bag, prefix, &NAME_KEYS)
                    .and_then(value_as_string)
                    .unwrap_or_default(),
            })
        }
        Convention::Nested { key } => {
            let obj = bag.get(key)?.as_object()?;
            let hp = nested_key(obj, &HP_KEYS)
                .and_then(|k| obj.get(k))
                .and_then(value_as_u32)?;
            Some(VitalState {
                hp,
                max_hp: nested_value(obj, &MAX_HP_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(hp),
                temp_hp: nested_value(obj, &TEMP_HP_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(0),
                mana: nested_value(obj, &MANA_KEYS).and_then(value_as_u32),
                max_mana: nested_value(obj, &MAX_MANA_KEYS).and_then(value_as_u32),
                armor: nested_value(obj, &ARMOR_KEYS)
                    .and_then(value_as_u32)
                    .unwrap_or(0),
                name: nested_value(obj, &NAME_KEYS)
                    .and_then(value_as_string)
                    .unwrap_or_default(),
            })
        }
    }
}

fn hp_tracker_object(bag: &AttributeBag) -> Option<&serde_json::Map<String, Value>> {
    let obj = bag.get(HP_TRACKER_KEY)?.as_object()?;
    obj.get("hp").and_then(value_as_u32).map(|_| obj)
}

/// First existing composite key `"<prefix>/<field>"` for a synonym list
pub(crate) fn flat_key(bag: &AttributeBag, prefix: &str, fields: &[&str]) -> Option<String> {
    fields.iter().map(|field| format!("{prefix}/{field}")).find(|k| bag.contains_key(k))
}

fn flat_value<'a>(bag: &'a AttributeBag, prefix: &str, fields: &[&str]) -> Option<&'a Value> {
    flat_key(bag, prefix, fields).and_then(|k| bag.get(&k))
}

/// First field synonym present in a nested object
pub(crate) fn nested_key<'a>(
    obj: &serde_json::Map<String, Value>,
    fields: &[&'a str],
) -> Option<&'a str> {
    fields.iter().copied().find(|k| obj.contains_key(*k))
}

fn nested_value<'a>(
    obj: &'a serde_json::Map<String, Value>,
    fields: &[&str],
) -> Option<&'a Value> {
    nested_key(obj, fields).and_then(|k| obj.get(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> AttributeBag {
        value.as_object().cloned().expect("test bag must be an object")
    }

    #[test]
    fn test_empty_bag_is_not_found() {
        assert_eq!(detect(&AttributeBag::new()), None);
        assert_eq!(parse(&AttributeBag::new()), None);
    }

    #[test]
    fn test_unrelated_keys_are_not_found() {
        let bag = bag(json!({
            "com.example.lighting/radius": 30,
            "notes": "just a prop"
        }));
        assert_eq!(parse(&bag), None);
    }

    #[test]
    fn test_hp_tracker_minimal_object() {
        let bag = bag(json!({
            "com.bitperfect-software.hp-tracker/data": { "hp": 8 }
        }));

        assert_eq!(detect(&bag), Some(Convention::HpTracker));
        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 8);
        assert_eq!(state.max_hp, 8);
        assert_eq!(state.temp_hp, 0);
        assert_eq!(state.mana, None);
        assert_eq!(state.max_mana, None);
        assert_eq!(state.armor, 0);
    }

    #[test]
    fn test_hp_tracker_with_max() {
        let bag = bag(json!({
            "com.bitperfect-software.hp-tracker/data": { "hp": 12, "maxHp": 20 }
        }));

        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 12);
        assert_eq!(state.max_hp, 20);
    }

    #[test]
    fn test_hp_tracker_without_hp_falls_through() {
        // The named key exists but has no hp field; later strategies still run
        let bag = bag(json!({
            "com.bitperfect-software.hp-tracker/data": { "label": "x" },
            "com.grimoire/hp": 5
        }));

        assert_eq!(detect(&bag), Some(Convention::FlatPrefixed { prefix: "com.grimoire" }));
    }

    #[test]
    fn test_flat_full_fields() {
        let bag = bag(json!({
            "com.battle-system.gmg/hp": 17,
            "com.battle-system.gmg/maxHp": 25,
            "com.battle-system.gmg/tempHp": 3,
            "com.battle-system.gmg/mana": 6,
            "com.battle-system.gmg/maxMana": 10,
            "com.battle-system.gmg/ac": 14,
            "com.battle-system.gmg/name": "Skeleton"
        }));

        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 17);
        assert_eq!(state.max_hp, 25);
        assert_eq!(state.temp_hp, 3);
        assert_eq!(state.mana, Some(6));
        assert_eq!(state.max_mana, Some(10));
        assert_eq!(state.armor, 14);
        assert_eq!(state.name, "Skeleton");
    }

    #[test]
    fn test_flat_defaults() {
        let bag = bag(json!({ "grimoire/currentHp": 9 }));

        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 9);
        assert_eq!(state.max_hp, 9);
        assert_eq!(state.temp_hp, 0);
        // No resource pool is distinct from an empty resource pool
        assert_eq!(state.mana, None);
        assert_eq!(state.armor, 0);
        assert_eq!(state.name, "");
    }

    #[test]
    fn test_flat_prefix_priority_order() {
        // Both prefixes have a health value; the earlier one in the fixed
        // list must win even though the other sorts first alphabetically.
        let bag = bag(json!({
            "battle-system/hp": 1,
            "com.battle-system.gmg/hp": 2
        }));

        assert_eq!(
            detect(&bag),
            Some(Convention::FlatPrefixed { prefix: "com.battle-system.gmg" })
        );
        assert_eq!(parse(&bag).unwrap().hp, 2);
    }

    #[test]
    fn test_flat_field_synonym_order() {
        let bag = bag(json!({
            "grimoire/current-hp": 4,
            "grimoire/hp": 6
        }));

        // "hp" is probed before "current-hp"
        assert_eq!(parse(&bag).unwrap().hp, 6);
    }

    #[test]
    fn test_nested_object() {
        let bag = bag(json!({
            "com.example.sheet/stats": {
                "currentHp": 11,
                "hpMax": 30,
                "temp-hp": 2,
                "mp": 4,
                "manaMax": 8,
                "defence": 12,
                "displayName": "Witch"
            }
        }));

        assert_eq!(
            detect(&bag),
            Some(Convention::Nested { key: "com.example.sheet/stats".to_string() })
        );
        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 11);
        assert_eq!(state.max_hp, 30);
        assert_eq!(state.temp_hp, 2);
        assert_eq!(state.mana, Some(4));
        assert_eq!(state.max_mana, Some(8));
        assert_eq!(state.armor, 12);
        assert_eq!(state.name, "Witch");
    }

    #[test]
    fn test_flat_beats_nested() {
        // A bag matching both strategy 2 and strategy 3 resolves to the flat
        // convention; strategy order is a compatibility contract.
        let bag = bag(json!({
            "aaa.some.extension/block": { "hp": 50 },
            "hp-tracker/hp": 3
        }));

        assert_eq!(detect(&bag), Some(Convention::FlatPrefixed { prefix: "hp-tracker" }));
        assert_eq!(parse(&bag).unwrap().hp, 3);
    }

    #[test]
    fn test_numeric_string_coercion() {
        let bag = bag(json!({
            "grimoire/hp": "15",
            "grimoire/maxHp": "20.9"
        }));

        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 15);
        assert_eq!(state.max_hp, 20);
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let bag = bag(json!({ "grimoire/hp": -4, "grimoire/maxHp": 10 }));
        let state = parse(&bag).unwrap();
        assert_eq!(state.hp, 0);
    }

    #[test]
    fn test_non_numeric_hp_is_not_found() {
        let bag = bag(json!({ "grimoire/hp": true }));
        assert_eq!(detect(&bag), None);
        assert_eq!(parse(&bag), None);
    }

    #[test]
    fn test_parse_with_mismatched_convention() {
        let bag = bag(json!({ "grimoire/hp": 5 }));
        assert_eq!(parse_with(&bag, &Convention::HpTracker), None);
    }
}
