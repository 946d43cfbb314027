//! Dice rolling.
//!
//! Supports the simple notation used throughout the game (`NdS+M`), a
//! pluggable [`DiceRoller`] so combat can be scripted in tests, and the
//! 4d6-drop-lowest ability roll used at character creation.

use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
}

/// Source of die results.
///
/// Every random decision the combat resolver makes goes through this trait.
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;

    fn d20(&mut self) -> u32 {
        self.roll_die(20)
    }

    /// Roll `count` dice and sum them.
    fn roll_many(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll_die(sides)).sum()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let sides = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        (self.roll_die(sides) - 1) as usize
    }
}

/// A [`DiceRoller`] backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> DiceRoller for RngDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// A parsed `NdS+M` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpression {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse a dice notation string such as `1d8`, `2d6+3`, `d20`, `1d12 - 1`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let compact: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(DiceError::NoDice);
        }

        let d_pos = compact
            .find('d')
            .ok_or_else(|| DiceError::InvalidNotation(notation.to_string()))?;
        let count_str = &compact[..d_pos];
        let rest = &compact[d_pos + 1..];

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?
        };
        if count == 0 {
            return Err(DiceError::NoDice);
        }

        let (sides_str, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(sign_pos) => {
                let value: i32 = rest[sign_pos + 1..]
                    .parse()
                    .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;
                let sign = if rest.as_bytes()[sign_pos] == b'-' { -1 } else { 1 };
                (&rest[..sign_pos], sign * value)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;
        if sides == 0 {
            return Err(DiceError::InvalidDieSize(sides));
        }

        Ok(Self::new(count, sides, modifier))
    }

    /// Roll the expression. The total is floored at 1.
    pub fn roll_with<D: DiceRoller + ?Sized>(&self, dice: &mut D) -> i32 {
        let rolled = dice.roll_many(self.count, self.sides) as i32;
        (rolled + self.modifier).max(1)
    }

    /// Roll with an extra flat modifier on top of the expression's own.
    pub fn roll_plus<D: DiceRoller + ?Sized>(&self, dice: &mut D, extra: i32) -> i32 {
        let rolled = dice.roll_many(self.count, self.sides) as i32;
        (rolled + self.modifier + extra).max(1)
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.count, self.sides),
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m => write!(f, "{}d{}-{}", self.count, self.sides, m.abs()),
        }
    }
}

/// Roll damage from notation plus a flat modifier, floored at 1.
///
/// Unparsable notation counts as a flat 1 before the modifier.
pub fn roll_damage<D: DiceRoller + ?Sized>(dice: &mut D, notation: &str, modifier: i32) -> i32 {
    match DiceExpression::parse(notation) {
        Ok(expr) => expr.roll_plus(dice, modifier),
        Err(_) => (1 + modifier).max(1),
    }
}

/// Roll one ability score: 4d6, drop the lowest.
pub fn roll_ability_score<D: DiceRoller + ?Sized>(dice: &mut D) -> u8 {
    let mut rolls: Vec<u32> = (0..4).map(|_| dice.roll_die(6)).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls.iter().take(3).sum::<u32>() as u8
}
