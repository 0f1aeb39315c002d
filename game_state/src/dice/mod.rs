//! Dice resolution - deterministic random primitives.
//!
//! Supports expressions like `"1d20+5"`, `"2d6-1"`, `"d100"`. All rolls
//! draw from an injectable [`RandomSource`], so the same seed replays the
//! same outcomes and tests can script exact die faces.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source of randomness for dice resolution.
///
/// Implementations must be deterministic under a fixed seed. The provided
/// `roll_die` maps raw output onto die faces with plain modular reduction,
/// which keeps scripted sources exact: a source yielding `k` rolls face
/// `k % sides + 1`.
pub trait RandomSource {
    /// Produce the next raw random value.
    fn next_u32(&mut self) -> u32;

    /// Roll one die with the given number of sides (1..=sides).
    fn roll_die(&mut self, sides: u32) -> u32 {
        (self.next_u32() % sides) + 1
    }
}

/// Production randomness seeded for replayability.
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Create a source from a session seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// Scripted randomness for tests and replays.
///
/// Cycles through the given raw values.
#[derive(Debug, Clone)]
pub struct FixedSource {
    values: Vec<u32>,
    cursor: usize,
}

impl FixedSource {
    /// Create a source that cycles through `values`.
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "FixedSource needs at least one value");
        Self { values, cursor: 0 }
    }
}

impl RandomSource for FixedSource {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Error when parsing a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,
    #[error("invalid dice expression: {0}")]
    InvalidFormat(String),
    #[error("dice count must be at least 1")]
    InvalidCount,
    #[error("die size must be at least 2")]
    InvalidSides,
}

/// A parsed dice expression of the form `NdM`, `NdM+K` or `NdM-K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    /// Number of dice rolled (N).
    pub count: u32,
    /// Faces per die (M).
    pub sides: u32,
    /// Flat modifier added after rolling (K).
    pub modifier: i32,
}

impl DiceExpression {
    /// Create an expression, validating count and sides.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Result<Self, DiceError> {
        if count == 0 {
            return Err(DiceError::InvalidCount);
        }
        if sides < 2 {
            return Err(DiceError::InvalidSides);
        }
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Parse an expression like `"1d20+5"`, `"2d6-1"` or `"d100"`.
    ///
    /// A missing count means one die.
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceError::Empty);
        }

        let d_pos = input
            .find('d')
            .ok_or_else(|| DiceError::InvalidFormat(format!("missing 'd' in '{}'", input)))?;

        let count_str = &input[..d_pos];
        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidFormat(format!("bad dice count '{}'", count_str)))?
        };

        let after_d = &input[d_pos + 1..];
        let (sides_str, modifier) = if let Some(pos) = after_d.find('+') {
            let modifier: i32 = after_d[pos + 1..]
                .parse()
                .map_err(|_| DiceError::InvalidFormat(format!("bad modifier in '{}'", input)))?;
            (&after_d[..pos], modifier)
        } else if let Some(pos) = after_d.find('-') {
            if pos == 0 {
                return Err(DiceError::InvalidFormat(format!(
                    "bad die size in '{}'",
                    input
                )));
            }
            let modifier: i32 = after_d[pos + 1..]
                .parse()
                .map_err(|_| DiceError::InvalidFormat(format!("bad modifier in '{}'", input)))?;
            (&after_d[..pos], -modifier)
        } else {
            (after_d, 0)
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidFormat(format!("bad die size '{}'", sides_str)))?;

        Self::new(count, sides, modifier)
    }

    /// Roll the expression against the given randomness source.
    pub fn roll(&self, source: &mut dyn RandomSource) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count).map(|_| source.roll_die(self.sides)).collect();
        let rolled_value: u32 = rolls.iter().sum();
        DiceRoll {
            expression: self.to_string(),
            rolls,
            rolled_value,
            modifier: self.modifier,
            total: rolled_value as i32 + self.modifier,
        }
    }

    /// Smallest possible total.
    pub fn min_total(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// Largest possible total.
    pub fn max_total(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

impl std::fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.count, self.sides),
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m => write!(f, "{}d{}{}", self.count, self.sides, m),
        }
    }
}

/// The immutable result of one resolved dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// The expression that was rolled, e.g. `"1d6+2"`.
    pub expression: String,
    /// Individual die faces.
    pub rolls: Vec<u32>,
    /// Sum of the faces before the modifier.
    pub rolled_value: u32,
    /// Flat modifier applied.
    pub modifier: i32,
    /// `rolled_value + modifier`.
    pub total: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            DiceExpression::parse("1d6+2").unwrap(),
            DiceExpression::new(1, 6, 2).unwrap()
        );
        assert_eq!(
            DiceExpression::parse("2d6-1").unwrap(),
            DiceExpression::new(2, 6, -1).unwrap()
        );
        assert_eq!(
            DiceExpression::parse("d20").unwrap(),
            DiceExpression::new(1, 20, 0).unwrap()
        );
        assert_eq!(
            DiceExpression::parse(" 1D100 ").unwrap(),
            DiceExpression::new(1, 100, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(DiceExpression::parse(""), Err(DiceError::Empty));
        assert!(matches!(
            DiceExpression::parse("banana"),
            Err(DiceError::InvalidFormat(_))
        ));
        assert_eq!(DiceExpression::parse("0d6"), Err(DiceError::InvalidCount));
        assert_eq!(DiceExpression::parse("1d1"), Err(DiceError::InvalidSides));
    }

    #[test]
    fn test_roll_bounds_1d6_plus_2() {
        let expr = DiceExpression::parse("1d6+2").unwrap();
        let mut source = SeededSource::new(7);
        for _ in 0..200 {
            let roll = expr.roll(&mut source);
            assert!(roll.total >= 3 && roll.total <= 8, "total {}", roll.total);
            assert_eq!(roll.total, roll.rolled_value as i32 + roll.modifier);
        }
        assert_eq!(expr.min_total(), 3);
        assert_eq!(expr.max_total(), 8);
    }

    #[test]
    fn test_scripted_roll_is_exact() {
        // Raw value 2 maps to face 3 on a d6; 3 + 2 = 5.
        let expr = DiceExpression::parse("1d6+2").unwrap();
        let mut source = FixedSource::new([2]);
        let roll = expr.roll(&mut source);
        assert_eq!(roll.rolls, vec![3]);
        assert_eq!(roll.total, 5);
        assert_eq!(roll.expression, "1d6+2");
    }

    #[test]
    fn test_seeded_source_replays() {
        let expr = DiceExpression::parse("3d8+1").unwrap();
        let mut a = SeededSource::new(99);
        let mut b = SeededSource::new(99);
        for _ in 0..20 {
            assert_eq!(expr.roll(&mut a), expr.roll(&mut b));
        }
    }
}
