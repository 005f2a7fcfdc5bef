// The mana ledger keeps the maximum pool and the current balance consistent.
use crate::error::{ManaError, Result};
use crate::form::non_negative;
use crate::tables::{self, Blessing};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Whether an adjustment adds mana to or removes it from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Remove,
}

// Snapshot of the ledger handed back to the form layer after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub level: u8,
    pub blessing: Blessing,
    pub extra_mana_max: u32,
    pub max_mana: u32,
    pub current_mana: u32,
    pub current_mana_cap: Option<u32>, // None while the pool is uncapped.
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManaLedger {
    level: u8,
    blessing: Blessing,
    extra_mana_max: u32,
    max_mana: u32,
    current_mana: u32,
}

impl Default for ManaLedger {
    fn default() -> Self {
        Self::new(tables::MIN_LEVEL, Blessing::None, 0)
    }
}

impl ManaLedger {
    // Start with a full pool for the given inputs.
    pub fn new(level: u8, blessing: Blessing, extra_mana_max: u32) -> Self {
        let mut ledger = Self {
            level: tables::MIN_LEVEL,
            blessing,
            extra_mana_max,
            max_mana: 0,
            current_mana: 0,
        };
        ledger.level = ledger.supported_level(level);
        ledger.max_mana = ledger.capacity();
        ledger.current_mana = ledger.max_mana;
        ledger
    }

    // Rebuild a ledger from restored values, reclamping the balance.
    pub fn restore(level: u8, blessing: Blessing, extra_mana_max: u32, current_mana: u32) -> Self {
        let mut ledger = Self::new(level, blessing, extra_mana_max);
        ledger.current_mana = current_mana;
        let max = ledger.max_mana;
        ledger.apply_capacity_change(max);
        ledger
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn blessing(&self) -> Blessing {
        self.blessing
    }

    pub fn extra_mana_max(&self) -> u32 {
        self.extra_mana_max
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn current_mana(&self) -> u32 {
        self.current_mana
    }

    // Upper bound for the current balance, or `None` when the blessing lifts it.
    pub fn current_cap(&self) -> Option<u32> {
        if self.blessing.is_uncapped() {
            None
        } else {
            Some(self.max_mana)
        }
    }

    pub fn state(&self) -> LedgerState {
        LedgerState {
            level: self.level,
            blessing: self.blessing,
            extra_mana_max: self.extra_mana_max,
            max_mana: self.max_mana,
            current_mana: self.current_mana,
            current_mana_cap: self.current_cap(),
        }
    }

    // Levels outside the tables fall back to the nearest supported one.
    fn supported_level(&self, level: u8) -> u8 {
        if tables::is_supported_level(level) {
            level
        } else {
            let clamped = tables::clamp_level(level);
            warn!("Level {} is not supported, using {}", level, clamped);
            clamped
        }
    }

    fn capacity(&self) -> u32 {
        // `level` is always kept inside the table range.
        tables::recompute_max_capacity(self.level, self.blessing, self.extra_mana_max)
            .unwrap_or(self.extra_mana_max)
    }

    // Recompute the maximum from level, blessing and extra mana.
    pub fn recompute_max(&mut self) -> u32 {
        let new_max = self.capacity();
        self.apply_capacity_change(new_max);
        new_max
    }

    pub fn set_level(&mut self, level: u8) -> u32 {
        self.level = self.supported_level(level);
        self.recompute_max()
    }

    pub fn set_blessing(&mut self, blessing: Blessing) -> u32 {
        self.blessing = blessing;
        self.recompute_max()
    }

    pub fn set_extra_mana_max(&mut self, extra: u32) -> u32 {
        self.extra_mana_max = extra;
        self.recompute_max()
    }

    // Install a new maximum. The balance is only ever pulled down, never raised.
    pub fn apply_capacity_change(&mut self, new_max: u32) {
        self.max_mana = new_max;
        if !self.blessing.is_uncapped() && self.current_mana > new_max {
            debug!("Clamping current mana {} to {}", self.current_mana, new_max);
            self.current_mana = new_max;
        }
    }

    // Accept a raw value typed by the user. Missing or negative values become 0.
    pub fn set_current(&mut self, raw: Option<i64>) -> u32 {
        self.current_mana = self.clamp_to_cap(non_negative(raw));
        self.current_mana
    }

    fn clamp_to_cap(&self, value: u32) -> u32 {
        match self.current_cap() {
            Some(cap) => value.min(cap),
            None => value,
        }
    }

    // Add or remove mana. Removing more than is left is rejected without touching the pool.
    pub fn adjust(&mut self, amount: u32, direction: Direction) -> Result<u32> {
        let new_value = match direction {
            Direction::Add => self.current_mana.saturating_add(amount),
            Direction::Remove => {
                self.current_mana
                    .checked_sub(amount)
                    .ok_or(ManaError::Overdraw {
                        requested: amount,
                        available: self.current_mana,
                    })?
            }
        };
        self.current_mana = self.clamp_to_cap(new_value);
        Ok(self.current_mana)
    }

    pub fn can_spend(&self, cost: u32) -> bool {
        cost <= self.current_mana
    }

    pub fn spend(&mut self, cost: u32) -> Result<u32> {
        if !self.can_spend(cost) {
            return Err(ManaError::InsufficientMana {
                cost,
                available: self.current_mana,
            });
        }
        self.current_mana -= cost;
        Ok(self.current_mana)
    }

    // End of turn: regain the turn pool for the current level.
    pub fn refill_for_turn(&mut self) -> u32 {
        let pool = tables::turn_pool_for_level(self.level).unwrap_or(0);
        self.current_mana = self.clamp_to_cap(self.current_mana.saturating_add(pool));
        self.current_mana
    }

    pub fn reset_to_full(&mut self) -> u32 {
        self.current_mana = self.max_mana;
        self.current_mana
    }
}
