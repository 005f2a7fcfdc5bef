// Spell specification and cost calculation. The cost formula must never decrease
// when one of its inputs grows.

use crate::form::non_negative;
use serde::{Deserialize, Serialize};

// Inputs of the spell form, already sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSpec {
    pub patterns: u32,
    pub base_cost_sum: u32,
    pub range: u32,
}

impl Default for SpellSpec {
    fn default() -> Self {
        Self {
            patterns: 1,
            base_cost_sum: 0,
            range: 0,
        }
    }
}

impl SpellSpec {
    pub fn new(patterns: u32, base_cost_sum: u32, range: u32) -> Self {
        Self {
            patterns: patterns.max(1),
            base_cost_sum,
            range,
        }
    }

    pub fn cost_with<F: CostFormula + ?Sized>(&self, formula: &F) -> u32 {
        formula.cost(self.patterns, self.base_cost_sum, self.range)
    }
}

// Game-balance rule turning spell inputs into a mana cost.
pub trait CostFormula {
    fn cost(&self, patterns: u32, base_cost_sum: u32, range: u32) -> u32;
}

// `base_cost_sum * patterns + ceil(range / 5)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardCost;

pub const RANGE_STEP: u32 = 5;

impl CostFormula for StandardCost {
    fn cost(&self, patterns: u32, base_cost_sum: u32, range: u32) -> u32 {
        base_cost_sum
            .saturating_mul(patterns.max(1))
            .saturating_add(range.div_ceil(RANGE_STEP))
    }
}

impl<F> CostFormula for F
where
    F: Fn(u32, u32, u32) -> u32,
{
    fn cost(&self, patterns: u32, base_cost_sum: u32, range: u32) -> u32 {
        self(patterns, base_cost_sum, range)
    }
}

pub fn compute_cost(patterns: u32, base_cost_sum: u32, range: u32) -> u32 {
    StandardCost.cost(patterns, base_cost_sum, range)
}

// A spell always has at least one pattern.
pub fn sanitize_patterns(raw: Option<i64>) -> u32 {
    non_negative(raw).max(1)
}

// A spell can be cast when its cost fits in the current balance.
pub fn can_cast(cost: u32, current_mana: u32) -> bool {
    cost <= current_mana
}
