//! Damage type registry - static catalog of identifiers, display metadata,
//! and the resistance-multiplier vocabulary
//!
//! The catalog is defined once and never mutated. Exactly one entry is
//! `Special` (`Pure`), which bypasses resistance and armor entirely.

use serde::{Deserialize, Serialize};

/// The fixed set of damage type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    // Physical
    Slashing,
    Piercing,
    Bludgeoning,
    Chopping,
    // Magical
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Darkness,
    Space,
    Astral,
    Blight,
    Electricity,
    Void,
    Life,
    Nature,
    Death,
    Horror,
    // Special
    Pure,
}

/// Broad grouping of damage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    Physical,
    Magical,
    Special,
}

/// Catalog entry describing one damage type for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageTypeInfo {
    pub damage_type: DamageType,
    pub category: DamageCategory,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Catalog in declaration order; indexed by enum discriminant
static CATALOG: [DamageTypeInfo; 20] = [
    DamageTypeInfo { damage_type: DamageType::Slashing, category: DamageCategory::Physical, name: "Slashing", icon: "⚔️", color: "#c0c0c0" },
    DamageTypeInfo { damage_type: DamageType::Piercing, category: DamageCategory::Physical, name: "Piercing", icon: "🗡️", color: "#a0a0a0" },
    DamageTypeInfo { damage_type: DamageType::Bludgeoning, category: DamageCategory::Physical, name: "Bludgeoning", icon: "🔨", color: "#808080" },
    DamageTypeInfo { damage_type: DamageType::Chopping, category: DamageCategory::Physical, name: "Chopping", icon: "🪓", color: "#b0b0b0" },
    DamageTypeInfo { damage_type: DamageType::Fire, category: DamageCategory::Magical, name: "Fire", icon: "🔥", color: "#ff4500" },
    DamageTypeInfo { damage_type: DamageType::Water, category: DamageCategory::Magical, name: "Water", icon: "💧", color: "#1e90ff" },
    DamageTypeInfo { damage_type: DamageType::Earth, category: DamageCategory::Magical, name: "Earth", icon: "🌍", color: "#8b4513" },
    DamageTypeInfo { damage_type: DamageType::Air, category: DamageCategory::Magical, name: "Air", icon: "💨", color: "#87ceeb" },
    DamageTypeInfo { damage_type: DamageType::Light, category: DamageCategory::Magical, name: "Light", icon: "☀️", color: "#ffd700" },
    DamageTypeInfo { damage_type: DamageType::Darkness, category: DamageCategory::Magical, name: "Darkness", icon: "🌑", color: "#2f0a3c" },
    DamageTypeInfo { damage_type: DamageType::Space, category: DamageCategory::Magical, name: "Space", icon: "🌀", color: "#9400d3" },
    DamageTypeInfo { damage_type: DamageType::Astral, category: DamageCategory::Magical, name: "Astral", icon: "✨", color: "#e6e6fa" },
    DamageTypeInfo { damage_type: DamageType::Blight, category: DamageCategory::Magical, name: "Blight", icon: "☠️", color: "#556b2f" },
    DamageTypeInfo { damage_type: DamageType::Electricity, category: DamageCategory::Magical, name: "Electricity", icon: "⚡", color: "#00bfff" },
    DamageTypeInfo { damage_type: DamageType::Void, category: DamageCategory::Magical, name: "Void", icon: "🕳️", color: "#0a0a14" },
    DamageTypeInfo { damage_type: DamageType::Life, category: DamageCategory::Magical, name: "Life", icon: "💚", color: "#00ff00" },
    DamageTypeInfo { damage_type: DamageType::Nature, category: DamageCategory::Magical, name: "Nature", icon: "🌿", color: "#228b22" },
    DamageTypeInfo { damage_type: DamageType::Death, category: DamageCategory::Magical, name: "Death", icon: "💀", color: "#4a0080" },
    DamageTypeInfo { damage_type: DamageType::Horror, category: DamageCategory::Magical, name: "Horror", icon: "👁️", color: "#8b0000" },
    DamageTypeInfo { damage_type: DamageType::Pure, category: DamageCategory::Special, name: "Pure", icon: "💎", color: "#ffffff" },
];

impl DamageType {
    /// All damage types in catalog order
    pub fn all() -> &'static [DamageType] {
        &[
            DamageType::Slashing,
            DamageType::Piercing,
            DamageType::Bludgeoning,
            DamageType::Chopping,
            DamageType::Fire,
            DamageType::Water,
            DamageType::Earth,
            DamageType::Air,
            DamageType::Light,
            DamageType::Darkness,
            DamageType::Space,
            DamageType::Astral,
            DamageType::Blight,
            DamageType::Electricity,
            DamageType::Void,
            DamageType::Life,
            DamageType::Nature,
            DamageType::Death,
            DamageType::Horror,
            DamageType::Pure,
        ]
    }

    /// Catalog entry for this type. Total: the enum is closed, so an
    /// identifier outside the set is unrepresentable.
    pub fn info(self) -> &'static DamageTypeInfo {
        &CATALOG[self as usize]
    }

    pub fn category(self) -> DamageCategory {
        self.info().category
    }

    /// Whether this type bypasses resistance multipliers and armor
    pub fn is_pure(self) -> bool {
        self == DamageType::Pure
    }
}

/// The fixed, ordered resistance-multiplier vocabulary
pub const RESISTANCE_VALUES: [f64; 7] = [0.0, 0.25, 0.5, 1.0, 1.5, 2.0, 3.0];

/// Semantic label for a resistance multiplier.
///
/// Values outside the fixed vocabulary render as `×value`. The profile store
/// does not validate multipliers, so this fallback is an escape hatch rather
/// than an error.
pub fn multiplier_label(multiplier: f64) -> String {
    if multiplier == 0.0 {
        "immune".to_string()
    } else if multiplier == 0.25 {
        "strong resist".to_string()
    } else if multiplier == 0.5 {
        "resist".to_string()
    } else if multiplier == 1.0 {
        "normal".to_string()
    } else if multiplier == 1.5 {
        "weak".to_string()
    } else if multiplier == 2.0 {
        "vulnerable".to_string()
    } else if multiplier == 3.0 {
        "critically vulnerable".to_string()
    } else {
        format!("×{multiplier}")
    }
}

/// Display color ramp for a resistance multiplier
pub fn resistance_color(multiplier: f64) -> &'static str {
    if multiplier == 0.0 {
        "#00ff00"
    } else if multiplier < 1.0 {
        "#44ff44"
    } else if multiplier == 1.0 {
        "#888888"
    } else if multiplier <= 1.5 {
        "#ffaa00"
    } else if multiplier <= 2.0 {
        "#ff4444"
    } else {
        "#ff0000"
    }
}
