//! Damage resolver - deterministic reduction pipeline for one target
//!
//! Pure functions with no side effects: resistance multiplier, then flat
//! armor plus type armor, then floor at zero. Pure damage bypasses every
//! stage. Intermediate values are floored, not rounded; this is an
//! integer-damage system.

use serde::{Deserialize, Serialize};

use super::types::DamageType;
use crate::types::{CombinedView, EntityId};

/// One damage application: amount and type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInstruction {
    pub amount: u32,
    pub damage_type: DamageType,
}

impl DamageInstruction {
    pub fn new(amount: u32, damage_type: DamageType) -> Self {
        DamageInstruction { amount, damage_type }
    }
}

/// Outcome of applying one instruction to one entity's combined view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageResolution {
    pub entity_id: EntityId,
    pub name: String,

    pub raw_amount: u32,
    pub damage_type: DamageType,

    /// Multiplier applied; reported as 1 for pure damage
    pub multiplier: f64,
    /// Damage after the multiplier stage, floored to an integer
    pub after_multiplier: u32,
    /// Flat armor subtracted; reported as 0 for pure damage
    pub flat_reduction: u32,
    /// Type-specific armor subtracted; reported as 0 for pure damage
    pub type_reduction: u32,

    /// Damage after every stage, floored at zero
    pub final_damage: u32,

    pub hp_before: u32,
    pub max_hp: u32,
    pub hp_after: u32,
    /// Portion of final damage that exceeded remaining health
    pub overkill: u32,
    pub is_dead: bool,

    /// Textual trace of the stages actually applied, for operator display
    pub breakdown: String,
}

/// Resolve one damage instruction against one target.
///
/// Total and pure: the caller has already clamped the amount non-negative
/// (it is unsigned here), and every input combination produces a resolution.
pub fn resolve(view: &CombinedView, instruction: &DamageInstruction) -> DamageResolution {
    let amount = instruction.amount;
    let damage_type = instruction.damage_type;

    if damage_type.is_pure() {
        // Pure damage ignores multipliers and armor unconditionally
        let final_damage = amount;
        let hp_after = view.hp.saturating_sub(final_damage);
        return DamageResolution {
            entity_id: view.entity_id.clone(),
            name: view.name.clone(),
            raw_amount: amount,
            damage_type,
            multiplier: 1.0,
            after_multiplier: amount,
            flat_reduction: 0,
            type_reduction: 0,
            final_damage,
            hp_before: view.hp,
            max_hp: view.max_hp,
            hp_after,
            overkill: final_damage.saturating_sub(view.hp),
            is_dead: hp_after == 0,
            breakdown: format!("{amount} (pure) = {final_damage}"),
        };
    }

    let multiplier = view.multiplier(damage_type);
    let after_multiplier = (amount as f64 * multiplier).floor().max(0.0) as i64;

    let flat_reduction = view.flat_armor as i64;
    let type_reduction = view.type_armor(damage_type) as i64;
    let total_reduction = flat_reduction + type_reduction;

    let final_damage = (after_multiplier - total_reduction).max(0) as u32;

    let hp_after = view.hp.saturating_sub(final_damage);
    let overkill = final_damage.saturating_sub(view.hp);

    let mut breakdown = format!("{amount}");
    if multiplier != 1.0 {
        breakdown.push_str(&format!(" × {multiplier} = {after_multiplier}"));
    }
    if total_reduction > 0 {
        breakdown.push_str(&format!(" − {total_reduction}"));
    }
    breakdown.push_str(&format!(" = {final_damage}"));

    DamageResolution {
        entity_id: view.entity_id.clone(),
        name: view.name.clone(),
        raw_amount: amount,
        damage_type,
        multiplier,
        after_multiplier: after_multiplier as u32,
        flat_reduction: flat_reduction as u32,
        type_reduction: type_reduction as u32,
        final_damage,
        hp_before: view.hp,
        max_hp: view.max_hp,
        hp_after,
        overkill,
        is_dead: hp_after == 0,
        breakdown,
    }
}

/// Resolve the same instruction across a batch of independent targets
pub fn resolve_batch(
    views: &[CombinedView],
    amount: u32,
    damage_type: DamageType,
) -> Vec<DamageResolution> {
    let instruction = DamageInstruction::new(amount, damage_type);
    views.iter().map(|view| resolve(view, &instruction)).collect()
}
