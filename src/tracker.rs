// Event-driven glue between the input forms, the ledger and the save store.
// Every input event goes through `on_input_changed`, which diffs the form against
// its previous snapshot and runs only the recomputations the changed fields call for.

use crate::form::{
    Field, FieldValue, FormRecord, FormValues, MaxManaForm, SpellSpecForm, changed_fields,
    non_negative,
};
use crate::ledger::{Direction, LedgerState, ManaLedger};
use crate::save::{KeyValueStore, SaveManager};
use crate::spell::{CostFormula, StandardCost, can_cast, sanitize_patterns};
use crate::tables;
use log::{debug, info, warn};

// Something the form layer should reflect after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    MaxManaRecomputed(u32),
    CurrentClamped { to: u32 },
    // A raw input was replaced by a safe value.
    FieldReset { field: Field, value: u32 },
    CostRecalculated(u32),
    AdjustAmountReset,
    AdjustRejected { requested: u32, available: u32 },
    ManaSpent(u32),
    CastBlocked { cost: u32, available: u32 },
    TurnRefilled { gained: u32 },
    Persisted,
    PersistFailed(String),
}

// Result of one synchronous update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub state: LedgerState,
    pub spell: SpellSpecForm,
    pub can_cast: bool,
    pub effects: Vec<SideEffect>,
}

impl Update {
    pub fn has(&self, effect: &SideEffect) -> bool {
        self.effects.contains(effect)
    }
}

pub struct ManaTracker<S: KeyValueStore, F: CostFormula = StandardCost> {
    ledger: ManaLedger,
    spell: SpellSpecForm,
    adjust_amount: u32,
    formula: F,
    saves: SaveManager<S>,
    max_mana_values: FormValues,
    spell_values: FormValues,
}

impl<S: KeyValueStore> ManaTracker<S, StandardCost> {
    pub fn open(saves: SaveManager<S>) -> Self {
        Self::with_formula(saves, StandardCost)
    }
}

impl<S: KeyValueStore, F: CostFormula> ManaTracker<S, F> {
    // Restore the saved record if there is one. Max mana is always recomputed from the inputs.
    pub fn with_formula(saves: SaveManager<S>, formula: F) -> Self {
        let ledger = match saves.load() {
            Some(record) => {
                info!("Restored mana record: {:?}", record);
                record.to_ledger()
            }
            None => ManaLedger::default(),
        };

        let mut tracker = Self {
            ledger,
            spell: SpellSpecForm::default(),
            adjust_amount: 0,
            formula,
            saves,
            max_mana_values: FormValues::new(),
            spell_values: FormValues::new(),
        };
        tracker.spell.cost = tracker.spell.spec.cost_with(&tracker.formula);
        tracker.max_mana_values = tracker.record().to_values();
        tracker.spell_values = tracker.spell.to_values();
        tracker
    }

    pub fn ledger(&self) -> &ManaLedger {
        &self.ledger
    }

    pub fn state(&self) -> LedgerState {
        self.ledger.state()
    }

    pub fn spell(&self) -> SpellSpecForm {
        self.spell
    }

    pub fn record(&self) -> MaxManaForm {
        MaxManaForm::from(&self.ledger)
    }

    pub fn adjust_amount(&self) -> u32 {
        self.adjust_amount
    }

    pub fn saves(&self) -> &SaveManager<S> {
        &self.saves
    }

    // The spell form is only valid while its cost fits in the pool.
    pub fn can_cast(&self) -> bool {
        can_cast(self.spell.cost, self.ledger.current_mana())
    }

    fn update(&self, effects: Vec<SideEffect>) -> Update {
        Update {
            state: self.state(),
            spell: self.spell,
            can_cast: self.can_cast(),
            effects,
        }
    }

    // Apply a raw value from the form layer and run whatever it affects.
    pub fn on_input_changed(&mut self, field: Field, value: impl Into<FieldValue>) -> Update {
        let value = value.into();
        let mut effects = Vec::new();
        if field.is_spell_field() {
            self.on_spell_changed(field, value, &mut effects);
        } else {
            self.on_max_mana_changed(field, value, &mut effects);
        }
        self.update(effects)
    }

    fn on_max_mana_changed(
        &mut self,
        field: Field,
        value: FieldValue,
        effects: &mut Vec<SideEffect>,
    ) {
        let mut new_values = self.max_mana_values.clone();
        new_values.insert(field, value);
        let changes = changed_fields(&self.max_mana_values, &new_values);
        if changes.is_empty() {
            return;
        }
        debug!("Max mana form changes: {:?}", changes);

        let before = self.ledger.current_mana();
        let mut recomputed = None;

        if let Some(value) = changes.get(&Field::Level) {
            let raw = value.number();
            let level = u8::try_from(non_negative(raw)).unwrap_or(tables::MAX_LEVEL);
            recomputed = Some(self.ledger.set_level(level));
            reset_if_changed(Field::Level, raw, u32::from(self.ledger.level()), effects);
        }

        if let Some(value) = changes.get(&Field::ExtraManaMax) {
            let raw = value.number();
            let extra = non_negative(raw);
            recomputed = Some(self.ledger.set_extra_mana_max(extra));
            reset_if_changed(Field::ExtraManaMax, raw, extra, effects);
        }

        if let Some(blessing) = changes.get(&Field::Blessing).and_then(FieldValue::blessing) {
            recomputed = Some(self.ledger.set_blessing(blessing));
        }

        if let Some(max) = recomputed {
            effects.push(SideEffect::MaxManaRecomputed(max));
        }

        // Max mana is derived. A typed value is replaced by the recomputed one.
        if let Some(value) = changes.get(&Field::MaxMana) {
            let max = self.ledger.recompute_max();
            reset_if_changed(Field::MaxMana, value.number(), max, effects);
        }

        if let Some(value) = changes.get(&Field::CurrentMana) {
            let raw = value.number();
            let current = self.ledger.set_current(raw);
            reset_if_changed(Field::CurrentMana, raw, current, effects);
        } else if self.ledger.current_mana() < before {
            effects.push(SideEffect::CurrentClamped {
                to: self.ledger.current_mana(),
            });
        }

        self.commit(effects);
    }

    fn on_spell_changed(&mut self, field: Field, value: FieldValue, effects: &mut Vec<SideEffect>) {
        let mut new_values = self.spell_values.clone();
        new_values.insert(field, value);
        let changes = changed_fields(&self.spell_values, &new_values);
        if changes.is_empty() {
            return;
        }

        for (field, value) in &changes {
            let raw = value.number();
            match field {
                Field::Patterns => {
                    self.spell.spec.patterns = sanitize_patterns(raw);
                    reset_if_changed(*field, raw, self.spell.spec.patterns, effects);
                }
                Field::BaseCostSum => {
                    self.spell.spec.base_cost_sum = non_negative(raw);
                    reset_if_changed(*field, raw, self.spell.spec.base_cost_sum, effects);
                }
                Field::Range => {
                    self.spell.spec.range = non_negative(raw);
                    reset_if_changed(*field, raw, self.spell.spec.range, effects);
                }
                // Cost is derived and gets overwritten below.
                _ => {}
            }
        }

        self.spell.cost = self.spell.spec.cost_with(&self.formula);
        effects.push(SideEffect::CostRecalculated(self.spell.cost));
        self.spell_values = self.spell.to_values();
    }

    // Refresh the max mana snapshot and persist it. Write failures are only logged.
    fn commit(&mut self, effects: &mut Vec<SideEffect>) {
        let record = self.record();
        self.max_mana_values = record.to_values();
        match self.saves.save(&record) {
            Ok(()) => effects.push(SideEffect::Persisted),
            Err(e) => {
                warn!("Failed to save mana record: {}", e);
                effects.push(SideEffect::PersistFailed(e.to_string()));
            }
        }
    }

    // Set the add/remove amount. Missing or negative values become 0.
    pub fn set_adjust_amount(&mut self, raw: Option<i64>) -> u32 {
        self.adjust_amount = non_negative(raw);
        self.adjust_amount
    }

    pub fn add(&mut self) -> Update {
        self.adjust(Direction::Add)
    }

    pub fn remove(&mut self) -> Update {
        self.adjust(Direction::Remove)
    }

    fn adjust(&mut self, direction: Direction) -> Update {
        let mut effects = Vec::new();
        match self.ledger.adjust(self.adjust_amount, direction) {
            Ok(_) => {
                self.adjust_amount = 0;
                effects.push(SideEffect::AdjustAmountReset);
                self.commit(&mut effects);
            }
            Err(e) => {
                debug!("Adjustment rejected: {}", e);
                effects.push(SideEffect::AdjustRejected {
                    requested: self.adjust_amount,
                    available: self.ledger.current_mana(),
                });
            }
        }
        self.update(effects)
    }

    pub fn cast(&mut self) -> Update {
        let mut effects = Vec::new();
        let cost = self.spell.cost;
        if !self.can_cast() {
            effects.push(SideEffect::CastBlocked {
                cost,
                available: self.ledger.current_mana(),
            });
            return self.update(effects);
        }

        match self.ledger.spend(cost) {
            Ok(_) => {
                effects.push(SideEffect::ManaSpent(cost));
                self.commit(&mut effects);
            }
            Err(e) => warn!("Spell cast failed: {}", e),
        }
        self.update(effects)
    }

    pub fn end_turn(&mut self) -> Update {
        let mut effects = Vec::new();
        let before = self.ledger.current_mana();
        let after = self.ledger.refill_for_turn();
        effects.push(SideEffect::TurnRefilled {
            gained: after - before,
        });
        self.commit(&mut effects);
        self.update(effects)
    }

    pub fn reset_mana(&mut self) -> Update {
        let mut effects = Vec::new();
        self.ledger.reset_to_full();
        self.commit(&mut effects);
        self.update(effects)
    }

    // Drop the saved record and start over from defaults.
    pub fn clear(&mut self) -> Update {
        let mut effects = Vec::new();
        if let Err(e) = self.saves.clear() {
            warn!("Failed to clear mana record: {}", e);
            effects.push(SideEffect::PersistFailed(e.to_string()));
        }
        self.ledger = ManaLedger::default();
        self.spell = SpellSpecForm::default();
        self.spell.cost = self.spell.spec.cost_with(&self.formula);
        self.adjust_amount = 0;
        self.max_mana_values = self.record().to_values();
        self.spell_values = self.spell.to_values();
        self.update(effects)
    }
}

fn reset_if_changed(field: Field, raw: Option<i64>, value: u32, effects: &mut Vec<SideEffect>) {
    if raw != Some(i64::from(value)) {
        effects.push(SideEffect::FieldReset { field, value });
    }
}
