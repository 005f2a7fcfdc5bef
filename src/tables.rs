// Game rule tables: mana capacity and turn pool per level, multiplier per blessing.
use crate::error::{ManaError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

// Base mana capacity, indexed by `level - MIN_LEVEL`.
const CAPACITY_BY_LEVEL: [u32; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

// Mana regained at the end of each turn, indexed by `level - MIN_LEVEL`.
const TURN_POOL_BY_LEVEL: [u32; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 12];

// Blessings a character can carry. Each one scales the base capacity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Blessing {
    #[default]
    None,
    Gluttony, // Lifts the upper bound on current mana.
    Wisdom,
}

impl Blessing {
    pub fn multiplier(self) -> u32 {
        match self {
            Blessing::None => 1,
            Blessing::Gluttony => 1,
            Blessing::Wisdom => 2,
        }
    }

    // Whether current mana may exceed the maximum.
    pub fn is_uncapped(self) -> bool {
        matches!(self, Blessing::Gluttony)
    }
}

fn level_index(level: u8) -> Result<usize> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(usize::from(level - MIN_LEVEL))
    } else {
        Err(ManaError::UnsupportedLevel(level))
    }
}

pub fn is_supported_level(level: u8) -> bool {
    level_index(level).is_ok()
}

// Bring any level into the range covered by the tables.
pub fn clamp_level(level: u8) -> u8 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

pub fn capacity_for_level(level: u8) -> Result<u32> {
    Ok(CAPACITY_BY_LEVEL[level_index(level)?])
}

pub fn turn_pool_for_level(level: u8) -> Result<u32> {
    Ok(TURN_POOL_BY_LEVEL[level_index(level)?])
}

// Maximum mana for a character: `capacity[level] * multiplier[blessing] + extra`.
pub fn recompute_max_capacity(level: u8, blessing: Blessing, extra: u32) -> Result<u32> {
    let base = capacity_for_level(level)?;
    Ok(base
        .saturating_mul(blessing.multiplier())
        .saturating_add(extra))
}
