//! Damage types and the resolution pipeline

mod resolver;
mod types;

pub use resolver::{resolve, resolve_batch, DamageInstruction, DamageResolution};
pub use types::{
    multiplier_label, resistance_color, DamageCategory, DamageType, DamageTypeInfo,
    RESISTANCE_VALUES,
};
