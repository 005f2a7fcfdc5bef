use thiserror::Error;

// Enum for handling the errors raised by the mana tracker.
#[derive(Debug, Error)]
pub enum ManaError {
    #[error("Unsupported level: {0}")]
    UnsupportedLevel(u8), // Level outside of the capacity table.

    #[error("Cannot remove {requested} mana, only {available} left")]
    Overdraw { requested: u32, available: u32 }, // Adjustment would drop the pool below zero.

    #[error("Spell costs {cost} mana, only {available} left")]
    InsufficientMana { cost: u32, available: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<log::SetLoggerError> for ManaError {
    fn from(error: log::SetLoggerError) -> Self {
        ManaError::Logger(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ManaError>;
