//! The character record and its ability scores.

use crate::class_data::{ClassId, SUBCLASS_LEVEL};
use crate::items::{ArmorId, WeaponId};
use crate::reference::ReferenceTables;
use crate::rules::{self, RulesError, DEFAULT_ARMOR_CLASS};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;
pub const MIN_ABILITY_SCORE: u8 = 8;
pub const MAX_ABILITY_SCORE: u8 = 20;
pub const MAX_NAME_LEN: usize = 24;
pub const BASE_SPEED: u32 = 30;

/// Shown in place of a subclass below level 3.
pub const NO_SUBCLASS: &str = "N/A";

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Menu numbering, 1 = Strength through 6 = Charisma.
    pub fn from_menu_index(index: i64) -> Option<Ability> {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| Ability::all().get(i).copied())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn standard_array() -> Self {
        Self::new(15, 14, 13, 12, 10, 8)
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        rules::ability_modifier(self.get(ability))
    }

    /// The first score outside 8..=20, if any.
    pub fn out_of_range(&self) -> Option<(Ability, u8)> {
        Ability::all()
            .into_iter()
            .map(|a| (a, self.get(a)))
            .find(|(_, score)| !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(score))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// Why a character name was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must be at most 24 characters")]
    TooLong,
    #[error("name must not contain digits")]
    ContainsDigit,
}

pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        Err(NameError::Empty)
    } else if name.chars().count() > MAX_NAME_LEN {
        Err(NameError::TooLong)
    } else if name.chars().any(|c| c.is_ascii_digit()) {
        Err(NameError::ContainsDigit)
    } else {
        Ok(())
    }
}

/// A player character.
///
/// `proficiency` and `hit_points` are derived from level, class and
/// constitution; call [`Character::refresh_derived`] after changing any of
/// them. Armor class is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub level: u8,
    pub class: ClassId,
    pub subclass: Option<String>,
    pub background: String,
    pub race: String,
    pub alignment: String,
    pub abilities: AbilityScores,
    pub speed: u32,
    pub armor: Option<ArmorId>,
    pub weapon: Option<WeaponId>,
    pub has_shield: bool,
    pub proficiency: i32,
    pub hit_points: i32,
}

impl Character {
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    pub fn subclass_label(&self) -> &str {
        self.subclass.as_deref().unwrap_or(NO_SUBCLASS)
    }

    /// Whether the level allows a subclass.
    pub fn has_subclass_level(&self) -> bool {
        self.level >= SUBCLASS_LEVEL
    }

    /// Recompute proficiency and hit points.
    pub fn refresh_derived(&mut self, tables: &ReferenceTables) -> Result<(), RulesError> {
        let entry = tables
            .class(self.class)
            .ok_or_else(|| RulesError::UnknownHitDie(format!("class #{}", self.class.0)))?;
        let hit_die = entry
            .hit_die()
            .ok_or_else(|| RulesError::UnknownHitDie(entry.name.clone()))?;

        self.proficiency = rules::proficiency_modifier(self.level);
        self.hit_points = rules::hit_points(hit_die, self.abilities.constitution, self.level)?;
        Ok(())
    }

    /// Armor class from dexterity, equipped armor and shield.
    pub fn armor_class(&self, tables: &ReferenceTables) -> i32 {
        match self.armor.and_then(|id| tables.armor(id)) {
            Some(armor) => rules::armor_class(self.abilities.dexterity, armor, self.has_shield),
            None => {
                warn!(character = %self.name, "no known armor equipped, using default AC");
                DEFAULT_ARMOR_CLASS
            }
        }
    }

    pub fn class_name<'a>(&self, tables: &'a ReferenceTables) -> &'a str {
        tables.class(self.class).map_or("Unknown", |c| c.name.as_str())
    }

    pub fn armor_name<'a>(&self, tables: &'a ReferenceTables) -> &'a str {
        self.armor
            .and_then(|id| tables.armor(id))
            .map_or("None", |a| a.name.as_str())
    }

    pub fn weapon_name<'a>(&self, tables: &'a ReferenceTables) -> &'a str {
        self.weapon
            .and_then(|id| tables.weapon(id))
            .map_or("None", |w| w.name.as_str())
    }
}
