//! Roll results and aggregation.

use serde::{Deserialize, Serialize};

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DieRoll {
    /// The value rolled (1 to sides).
    pub value: u32,
    /// Whether this die survived the keep/drop modifiers.
    pub kept: bool,
}

/// The result of rolling an entire pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Individual die results in roll order.
    pub rolls: Vec<DieRoll>,
}

impl RollOutcome {
    /// Sum of all kept die values.
    pub fn total(&self) -> u32 {
        self.rolls.iter().filter(|d| d.kept).map(|d| d.value).sum()
    }

    /// Values of the kept dice in roll order.
    pub fn kept_values(&self) -> Vec<u32> {
        self.rolls
            .iter()
            .filter(|d| d.kept)
            .map(|d| d.value)
            .collect()
    }

    /// Number of dice rolled, kept or not.
    pub fn count(&self) -> usize {
        self.rolls.len()
    }

    /// Returns true if no dice were rolled.
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self
            .rolls
            .iter()
            .map(|d| {
                if d.kept {
                    d.value.to_string()
                } else {
                    format!("({})", d.value)
                }
            })
            .collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(values: &[(u32, bool)]) -> RollOutcome {
        RollOutcome {
            rolls: values
                .iter()
                .map(|&(value, kept)| DieRoll { value, kept })
                .collect(),
        }
    }

    #[test]
    fn total_ignores_dropped() {
        let r = outcome(&[(6, true), (3, false), (2, true)]);
        assert_eq!(r.total(), 8);
        assert_eq!(r.kept_values(), vec![6, 2]);
    }

    #[test]
    fn empty_outcome() {
        let r = RollOutcome::default();
        assert_eq!(r.total(), 0);
        assert!(r.is_empty());
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn display_marks_dropped() {
        let r = outcome(&[(5, true), (1, false)]);
        assert_eq!(r.to_string(), "[5, (1)] = 5");
    }
}
