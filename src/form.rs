// Flat records of the two input forms and the change detector run between snapshots.

use crate::ledger::ManaLedger;
use crate::spell::SpellSpec;
use crate::tables::{self, Blessing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Every input the form layer can report a change for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    // Max mana form
    Level,
    Blessing,
    ExtraManaMax,
    MaxMana,
    CurrentMana,
    // Spell spec form
    Patterns,
    BaseCostSum,
    Range,
    Cost,
}

impl Field {
    pub fn is_spell_field(self) -> bool {
        matches!(
            self,
            Field::Patterns | Field::BaseCostSum | Field::Range | Field::Cost
        )
    }
}

// Raw value of a form field. A numeric input may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Number(Option<i64>),
    Blessing(Blessing),
}

impl FieldValue {
    pub fn number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(value) => *value,
            FieldValue::Blessing(_) => None,
        }
    }

    pub fn blessing(&self) -> Option<Blessing> {
        match self {
            FieldValue::Blessing(blessing) => Some(*blessing),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(Some(i64::from(value)))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Some(value))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Blessing> for FieldValue {
    fn from(value: Blessing) -> Self {
        FieldValue::Blessing(value)
    }
}

pub type FormValues = BTreeMap<Field, FieldValue>;

// Records that can be flattened into a field map for diffing.
pub trait FormRecord {
    fn to_values(&self) -> FormValues;
}

// The persisted max mana form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxManaForm {
    pub level: u8,
    pub blessing: Blessing,
    pub extra_mana_max: u32,
    pub max_mana: u32,
    pub current_mana: u32,
}

impl Default for MaxManaForm {
    fn default() -> Self {
        Self::from(&ManaLedger::default())
    }
}

impl From<&ManaLedger> for MaxManaForm {
    fn from(ledger: &ManaLedger) -> Self {
        Self {
            level: ledger.level(),
            blessing: ledger.blessing(),
            extra_mana_max: ledger.extra_mana_max(),
            max_mana: ledger.max_mana(),
            current_mana: ledger.current_mana(),
        }
    }
}

impl MaxManaForm {
    // Rebuild the ledger from a restored record. Max mana is recomputed from the inputs.
    pub fn to_ledger(&self) -> ManaLedger {
        ManaLedger::restore(
            tables::clamp_level(self.level),
            self.blessing,
            self.extra_mana_max,
            self.current_mana,
        )
    }
}

impl FormRecord for MaxManaForm {
    fn to_values(&self) -> FormValues {
        BTreeMap::from([
            (Field::Level, u32::from(self.level).into()),
            (Field::Blessing, self.blessing.into()),
            (Field::ExtraManaMax, self.extra_mana_max.into()),
            (Field::MaxMana, self.max_mana.into()),
            (Field::CurrentMana, self.current_mana.into()),
        ])
    }
}

// Spell spec form with its derived cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellSpecForm {
    pub spec: SpellSpec,
    pub cost: u32,
}

impl FormRecord for SpellSpecForm {
    fn to_values(&self) -> FormValues {
        BTreeMap::from([
            (Field::Patterns, self.spec.patterns.into()),
            (Field::BaseCostSum, self.spec.base_cost_sum.into()),
            (Field::Range, self.spec.range.into()),
            (Field::Cost, self.cost.into()),
        ])
    }
}

// Keys of `new` whose value differs from `old`, with their new value.
// Two empty values compare equal, so clearing an already empty field is not a change.
pub fn changed_fields<K, V>(old: &BTreeMap<K, V>, new: &BTreeMap<K, V>) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    new.iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// Missing or negative values become 0.
pub fn non_negative(raw: Option<i64>) -> u32 {
    match raw {
        Some(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => 0,
    }
}
