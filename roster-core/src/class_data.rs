//! D&D 5e classes and their subclass catalog.
//!
//! The twelve PHB classes carry a fixed hit die. Catalog rows name a class
//! and its four subclasses; a row whose class is not one of the twelve is
//! still listed, but has no hit die.

use crate::dice::DieType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of subclasses every catalog row carries.
pub const SUBCLASS_COUNT: usize = 4;

/// Level at which a character picks a subclass.
pub const SUBCLASS_LEVEL: u8 = 3;

/// Index of a class in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId(pub usize);

/// D&D character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub fn hit_die(&self) -> DieType {
        match self {
            CharacterClass::Barbarian => DieType::D12,
            CharacterClass::Fighter | CharacterClass::Paladin | CharacterClass::Ranger => {
                DieType::D10
            }
            CharacterClass::Bard
            | CharacterClass::Cleric
            | CharacterClass::Druid
            | CharacterClass::Monk
            | CharacterClass::Rogue
            | CharacterClass::Warlock => DieType::D8,
            CharacterClass::Sorcerer | CharacterClass::Wizard => DieType::D6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    pub fn all() -> [CharacterClass; 12] {
        [
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    /// Exact, case-sensitive match on the class name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| format!("unknown class: {s}"))
    }
}

/// One row of the class catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    /// `None` when the name is not a known class.
    pub class: Option<CharacterClass>,
    pub subclasses: [String; SUBCLASS_COUNT],
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, subclasses: [String; SUBCLASS_COUNT]) -> Self {
        let name = name.into();
        let class = name.parse().ok();
        Self {
            name,
            class,
            subclasses,
        }
    }

    pub fn hit_die(&self) -> Option<DieType> {
        self.class.map(|class| class.hit_die())
    }

    pub fn has_subclass(&self, subclass: &str) -> bool {
        self.subclasses.iter().any(|s| s == subclass)
    }

    /// Parse a `Class,Sub1,Sub2,Sub3,Sub4` row.
    pub fn parse_row(line: &str) -> Option<ClassEntry> {
        let mut fields = line.split(',').map(str::trim);
        let name = fields.next().filter(|n| !n.is_empty())?;
        let subclasses: Vec<String> = fields.map(str::to_string).collect();
        let subclasses: [String; SUBCLASS_COUNT] = subclasses.try_into().ok()?;
        Some(ClassEntry::new(name, subclasses))
    }
}
