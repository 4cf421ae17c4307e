//! Heuristic state locator
//!
//! Translates between an arbitrary attribute bag and
//! [`VitalState`](crate::types::VitalState), and
//! performs the inverse write. Three conventions are recognized, probed in a
//! fixed order with no merging across strategies:
//!
//! 1. the named third-party tracker key holding a nested object,
//! 2. flat `"<prefix>/<field>"` keys over a fixed prefix list,
//! 3. the first top-level nested object containing an hp-like key.
//!
//! The order is a compatibility contract; reordering would silently change
//! which convention a coincidentally-matching bag resolves to. Detection and
//! parsing share one code path so the write side replays the exact convention
//! the read side chose.

mod parse;
mod write;

pub use parse::{detect, parse, parse_with, Convention};
pub use write::{write_health, StateNotFound};

use serde_json::Value;

/// Well-known key of the third-party hp-tracker extension
pub const HP_TRACKER_KEY: &str = "com.bitperfect-software.hp-tracker/data";

/// Known flat-key prefixes, probed in order; the first prefix yielding a
/// health value wins
pub const KNOWN_PREFIXES: [&str; 7] = [
    "com.battle-system.gmg",
    "com.battle-system",
    "com.grimoire",
    "grimoire",
    "battle-system",
    "hp-tracker",
    "com.hp-tracker",
];

/// Field-name synonyms, each probed in order
pub(crate) const HP_KEYS: [&str; 3] = ["hp", "currentHp", "current-hp"];
pub(crate) const MAX_HP_KEYS: [&str; 4] = ["maxHp", "max-hp", "hpMax", "hp-max"];
pub(crate) const TEMP_HP_KEYS: [&str; 3] = ["tempHp", "temp-hp", "temporaryHp"];
pub(crate) const MANA_KEYS: [&str; 3] = ["mana", "mp", "currentMana"];
pub(crate) const MAX_MANA_KEYS: [&str; 3] = ["maxMana", "max-mana", "manaMax"];
pub(crate) const ARMOR_KEYS: [&str; 4] = ["ac", "armor", "defence", "defense"];
pub(crate) const NAME_KEYS: [&str; 2] = ["name", "displayName"];

/// Coerce a bag value to a non-negative integer.
///
/// Foreign extensions store numbers both as JSON numbers and as numeric
/// strings; fractions floor and negatives clamp to zero.
pub(crate) fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.max(0.0).floor() as u32),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0).floor() as u32),
        _ => None,
    }
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
