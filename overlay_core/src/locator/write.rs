//! Write path - reconcile a new health value back into the source bag
//!
//! Writes re-run detection and mutate fields in place inside whichever
//! convention the bag already uses. The engine never migrates an entity to
//! another storage convention.

use serde_json::Value;
use thiserror::Error;

use super::parse::{detect, flat_key, nested_key, parse_with, Convention};
use super::{HP_KEYS, HP_TRACKER_KEY, TEMP_HP_KEYS};
use crate::types::AttributeBag;

/// No recognized convention was found at write time.
///
/// At the batch level this is a per-target failure, not an abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no recognized tracker state in attribute bag")]
pub struct StateNotFound;

/// Overwrite the health (and optionally temporary health) fields in place.
///
/// Health is clamped to `[0, max_hp]` against the bag's own maximum before
/// writing. Reading immediately after a successful write reproduces the
/// written value exactly, under every convention.
pub fn write_health(
    bag: &mut AttributeBag,
    new_hp: u32,
    new_temp_hp: Option<u32>,
) -> Result<(), StateNotFound> {
    let convention = detect(bag).ok_or(StateNotFound)?;
    let current = parse_with(bag, &convention).ok_or(StateNotFound)?;
    let clamped_hp = new_hp.min(current.max_hp);

    match convention {
        Convention::HpTracker => {
            let obj = bag
                .get_mut(HP_TRACKER_KEY)
                .and_then(Value::as_object_mut)
                .ok_or(StateNotFound)?;
            obj.insert("hp".to_string(), Value::from(clamped_hp));
            // This tracker has no temp-health field; inventing one would
            // write data the foreign extension never reads.
        }
        Convention::FlatPrefixed { prefix } => {
            let hp_key = flat_key(bag, prefix, &HP_KEYS).ok_or(StateNotFound)?;
            bag.insert(hp_key, Value::from(clamped_hp));

            if let Some(temp) = new_temp_hp {
                let temp_key = flat_key(bag, prefix, &TEMP_HP_KEYS)
                    .unwrap_or_else(|| format!("{prefix}/tempHp"));
                bag.insert(temp_key, Value::from(temp));
            }
        }
        Convention::Nested { key } => {
            let obj = bag
                .get_mut(&key)
                .and_then(Value::as_object_mut)
                .ok_or(StateNotFound)?;
            let hp_key = nested_key(obj, &HP_KEYS).ok_or(StateNotFound)?;
            obj.insert(hp_key.to_string(), Value::from(clamped_hp));

            if let Some(temp) = new_temp_hp {
                let temp_key = nested_key(obj, &TEMP_HP_KEYS).unwrap_or("tempHp");
                obj.insert(temp_key.to_string(), Value::from(temp));
            }
        }
    }

    Ok(())
}
