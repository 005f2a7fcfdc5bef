pub mod error;
pub mod form;
pub mod ledger;
pub mod logging;
pub mod save;
pub mod settings;
pub mod spell;
pub mod tables;
pub mod tracker;

// Re-export commonly used items for easier access
pub use error::ManaError;
pub use form::{Field, FieldValue, FormRecord, FormValues, MaxManaForm, SpellSpecForm, changed_fields};
pub use ledger::{Direction, LedgerState, ManaLedger};
pub use save::{FileStore, KeyValueStore, MemoryStore, STORAGE_KEY, SaveManager};
pub use settings::Settings;
pub use spell::{CostFormula, SpellSpec, StandardCost, compute_cost};
pub use tables::{Blessing, MAX_LEVEL, MIN_LEVEL, recompute_max_capacity};
pub use tracker::{ManaTracker, SideEffect, Update};
