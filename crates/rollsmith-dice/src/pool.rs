//! Dice pool notation and rolling.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::roll::{DieRoll, RollOutcome};
use crate::{DiceError, DiceResult};

/// A keep/drop modifier applied after the pool is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolMod {
    /// Keep the N highest kept dice.
    KeepHighest(u32),
    /// Keep the N lowest kept dice.
    KeepLowest(u32),
    /// Drop the N highest kept dice.
    DropHighest(u32),
    /// Drop the N lowest kept dice.
    DropLowest(u32),
}

/// A parsed dice pool: `count` dice of `sides` sides plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    /// How many dice to roll.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
    /// Keep/drop modifiers, applied in order.
    pub mods: Vec<PoolMod>,
}

impl DicePool {
    /// Parse notation like `3d6`, `d20`, or `4d10Kh3Dl1`.
    pub fn parse(notation: &str) -> DiceResult<Self> {
        let bad = || DiceError::Notation(notation.to_string());
        let lower = notation.trim().to_lowercase();

        let (head, tail) = lower.split_once('d').ok_or_else(bad)?;
        let count = if head.is_empty() {
            1
        } else {
            head.parse::<u32>().map_err(|_| bad())?
        };

        let sides_end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        let sides = tail[..sides_end].parse::<u32>().map_err(|_| bad())?;
        if count == 0 || sides == 0 {
            return Err(bad());
        }

        let mut mods = Vec::new();
        let mut rest = &tail[sides_end..];
        while !rest.is_empty() {
            let tag = rest.get(..2).ok_or_else(bad)?;
            rest = &rest[2..];
            let num_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let n = rest[..num_end].parse::<u32>().map_err(|_| bad())?;
            rest = &rest[num_end..];
            mods.push(match tag {
                "kh" => PoolMod::KeepHighest(n),
                "kl" => PoolMod::KeepLowest(n),
                "dh" => PoolMod::DropHighest(n),
                "dl" => PoolMod::DropLowest(n),
                _ => return Err(bad()),
            });
        }

        Ok(Self { count, sides, mods })
    }

    /// Roll the pool with the given RNG and apply all modifiers.
    pub fn roll(&self, rng: &mut StdRng) -> RollOutcome {
        let mut rolls: Vec<DieRoll> = (0..self.count)
            .map(|_| DieRoll {
                value: rng.random_range(1..=self.sides),
                kept: true,
            })
            .collect();

        for m in &self.mods {
            apply_mod(&mut rolls, *m);
        }

        RollOutcome { rolls }
    }
}

impl std::fmt::Display for DicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        for m in &self.mods {
            match m {
                PoolMod::KeepHighest(n) => write!(f, "kh{n}")?,
                PoolMod::KeepLowest(n) => write!(f, "kl{n}")?,
                PoolMod::DropHighest(n) => write!(f, "dh{n}")?,
                PoolMod::DropLowest(n) => write!(f, "dl{n}")?,
            }
        }
        Ok(())
    }
}

/// Indices of kept dice, ordered lowest value first.
fn kept_ascending(rolls: &[DieRoll]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rolls.len()).filter(|&i| rolls[i].kept).collect();
    indices.sort_by_key(|&i| rolls[i].value);
    indices
}

fn apply_mod(rolls: &mut [DieRoll], m: PoolMod) {
    let ascending = kept_ascending(rolls);
    let kept = ascending.len();
    let drop_set: Vec<usize> = match m {
        // Keeping N means dropping everything below/above the cut.
        PoolMod::KeepHighest(n) => ascending[..kept.saturating_sub(n as usize)].to_vec(),
        PoolMod::KeepLowest(n) => ascending[(n as usize).min(kept)..].to_vec(),
        PoolMod::DropHighest(n) => ascending[kept.saturating_sub(n as usize)..].to_vec(),
        PoolMod::DropLowest(n) => ascending[..(n as usize).min(kept)].to_vec(),
    };
    for i in drop_set {
        rolls[i].kept = false;
    }
}
