//! D&D dice rolling system.
//!
//! A [`Dice`] owns the session's random generator. It is seeded once at
//! startup, from the clock or from a fixed seed, and every roll in the
//! session draws from it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Error type for dice parsing and rolling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("Unknown damage dice: {0}")]
    UnknownDamageDice(String),
}

/// Standard D&D die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// The session's die roller.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: StdRng,
}

impl Dice {
    /// Seed from the current time.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(seed)
    }

    /// Seed with a fixed value (useful for testing and replays).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll a single die, uniformly in `1..=sides`.
    pub fn roll(&mut self, die: DieType) -> u32 {
        self.rng.gen_range(1..=die.sides())
    }

    /// Roll a die given only its number of sides.
    pub fn roll_sides(&mut self, sides: u32) -> Result<u32, DiceError> {
        let die = DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;
        Ok(self.roll(die))
    }

    pub fn d4(&mut self) -> u32 {
        self.roll(DieType::D4)
    }

    pub fn d6(&mut self) -> u32 {
        self.roll(DieType::D6)
    }

    pub fn d8(&mut self) -> u32 {
        self.roll(DieType::D8)
    }

    pub fn d10(&mut self) -> u32 {
        self.roll(DieType::D10)
    }

    pub fn d12(&mut self) -> u32 {
        self.roll(DieType::D12)
    }

    pub fn d20(&mut self) -> u32 {
        self.roll(DieType::D20)
    }

    /// Roll a d20 and add a flat modifier.
    pub fn d20_plus(&mut self, modifier: i32) -> RollResult {
        let natural = self.d20();
        RollResult::new(DieType::D20, vec![natural]).with_modifier(modifier)
    }
}

/// Weapon damage dice.
///
/// Only the labels that appear in the weapon catalog are accepted: `1d4`,
/// `1d6`, `1d8`, `1d10`, `1d12` and `2d6`, in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageDice {
    pub count: u32,
    pub die_type: DieType,
}

impl DamageDice {
    pub fn roll(&self, dice: &mut Dice) -> RollResult {
        let rolls = (0..self.count).map(|_| dice.roll(self.die_type)).collect();
        RollResult::new(self.die_type, rolls)
    }
}

impl FromStr for DamageDice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, die_type) = match s.trim().to_lowercase().as_str() {
            "1d4" => (1, DieType::D4),
            "1d6" => (1, DieType::D6),
            "1d8" => (1, DieType::D8),
            "1d10" => (1, DieType::D10),
            "1d12" => (1, DieType::D12),
            "2d6" => (2, DieType::D6),
            _ => return Err(DiceError::UnknownDamageDice(s.to_string())),
        };
        Ok(DamageDice { count, die_type })
    }
}

impl fmt::Display for DamageDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die_type)
    }
}

/// Result of a roll: the dice that came up plus a flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub die_type: DieType,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
}

impl RollResult {
    pub fn new(die_type: DieType, rolls: Vec<u32>) -> Self {
        let total = rolls.iter().sum::<u32>() as i32;
        Self {
            die_type,
            rolls,
            modifier: 0,
            total,
        }
    }

    /// Add a flat modifier to the roll.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier += modifier;
        self.total += modifier;
        self
    }

    /// The die face of a single-die roll.
    pub fn natural(&self) -> Option<u32> {
        match self.rolls.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Format the individual dice results for display.
    pub fn dice_display(&self) -> String {
        let dice_str = format!(
            "[{}]",
            self.rolls
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if self.modifier > 0 {
            format!("{} + {}", dice_str, self.modifier)
        } else if self.modifier < 0 {
            format!("{} - {}", dice_str, self.modifier.abs())
        } else {
            dice_str
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}
