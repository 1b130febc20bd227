//! Dice-notation parsing and rolling.
//!
//! Accepts the `NdM` notation used inside table text, with optional
//! keep/drop modifiers: `3d6`, `d20`, `4d10Kh3Dl1`. Modifiers apply in
//! the order written, each against the dice still kept:
//!
//! * `KhN` / `KlN` keep the N highest / lowest dice
//! * `DhN` / `DlN` drop the N highest / lowest dice
//!
//! Notation is case-insensitive. Rolling takes a caller-supplied RNG so
//! results can be made deterministic with a seed.

pub mod pool;
pub mod roll;

pub use pool::{DicePool, PoolMod};
pub use roll::{DieRoll, RollOutcome};

use thiserror::Error;

/// Result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;

/// Errors produced while parsing dice notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The notation string did not match `NdM` with optional modifiers.
    #[error("malformed dice notation: {0}")]
    Notation(String),
}
