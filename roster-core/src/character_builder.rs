//! Character builder.
//!
//! Collects a character's choices by name and checks them against the
//! reference tables in [`CharacterBuilder::build`], which also derives
//! proficiency and hit points.

use crate::character::{
    validate_name, Ability, AbilityScores, Character, NameError, BASE_SPEED, MAX_LEVEL,
    MIN_LEVEL,
};
use crate::class_data::SUBCLASS_LEVEL;
use crate::reference::ReferenceTables;
use crate::rules::{self, RulesError};
use thiserror::Error;

/// Error from character building.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Class selection is required")]
    MissingClass,

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("No hit die known for class {0}")]
    UnknownHitDie(String),

    #[error("Level {0} is outside 1-20")]
    LevelOutOfRange(u8),

    #[error("Ability scores are required")]
    MissingAbilityScores,

    #[error("{ability} score {score} is outside 8-20")]
    AbilityOutOfRange { ability: Ability, score: u8 },

    #[error("A subclass needs level 3, character is level {0}")]
    SubclassBelowLevel(u8),

    #[error("{class} has no subclass {subclass}")]
    UnknownSubclass { class: String, subclass: String },

    #[error("{0} selection is required")]
    Missing(&'static str),

    #[error("{value} is not a known {list}")]
    NotInList { list: &'static str, value: String },

    #[error("Unknown armor: {0}")]
    UnknownArmor(String),

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("{armor} needs {required} Strength, character has {strength}")]
    StrengthTooLow {
        armor: String,
        required: u8,
        strength: u8,
    },
}

/// Builder for characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    level: Option<u8>,
    class: Option<String>,
    subclass: Option<String>,
    background: Option<String>,
    race: Option<String>,
    alignment: Option<String>,
    ability_scores: Option<AbilityScores>,
    armor: Option<String>,
    weapon: Option<String>,
    has_shield: bool,
}

impl CharacterBuilder {
    /// Create a new character builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing character, keeping every choice.
    pub fn from_character(character: &Character, tables: &ReferenceTables) -> Self {
        Self {
            name: Some(character.name.clone()),
            level: Some(character.level),
            class: tables.class(character.class).map(|c| c.name.clone()),
            subclass: character.subclass.clone(),
            background: Some(character.background.clone()),
            race: Some(character.race.clone()),
            alignment: Some(character.alignment.clone()),
            ability_scores: Some(character.abilities),
            armor: character
                .armor
                .and_then(|id| tables.armor(id))
                .map(|a| a.name.clone()),
            weapon: character
                .weapon
                .and_then(|id| tables.weapon(id))
                .map(|w| w.name.clone()),
            has_shield: character.has_shield,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Defaults to level 1.
    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }

    pub fn no_subclass(mut self) -> Self {
        self.subclass = None;
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    pub fn armor(mut self, armor: impl Into<String>) -> Self {
        self.armor = Some(armor.into());
        self
    }

    pub fn no_armor(mut self) -> Self {
        self.armor = None;
        self
    }

    pub fn weapon(mut self, weapon: impl Into<String>) -> Self {
        self.weapon = Some(weapon.into());
        self
    }

    pub fn no_weapon(mut self) -> Self {
        self.weapon = None;
        self
    }

    pub fn shield(mut self, has_shield: bool) -> Self {
        self.has_shield = has_shield;
        self
    }

    /// Build the character, returning an error if any choice is missing or
    /// not allowed by the tables.
    pub fn build(self, tables: &ReferenceTables) -> Result<Character, BuilderError> {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        validate_name(&name)?;

        let level = self.level.unwrap_or(MIN_LEVEL);
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(BuilderError::LevelOutOfRange(level));
        }

        let class_name = self.class.ok_or(BuilderError::MissingClass)?;
        let class = tables
            .class_id(&class_name)
            .ok_or_else(|| BuilderError::UnknownClass(class_name.clone()))?;
        let entry = tables
            .class(class)
            .ok_or_else(|| BuilderError::UnknownClass(class_name.clone()))?;

        if let Some(subclass) = &self.subclass {
            if level < SUBCLASS_LEVEL {
                return Err(BuilderError::SubclassBelowLevel(level));
            }
            if !entry.has_subclass(subclass) {
                return Err(BuilderError::UnknownSubclass {
                    class: class_name,
                    subclass: subclass.clone(),
                });
            }
        }

        let background = in_list("background", self.background, &tables.backgrounds)?;
        let race = in_list("race", self.race, &tables.races)?;
        let alignment = in_list("alignment", self.alignment, &tables.alignments)?;

        let abilities = self
            .ability_scores
            .ok_or(BuilderError::MissingAbilityScores)?;
        if let Some((ability, score)) = abilities.out_of_range() {
            return Err(BuilderError::AbilityOutOfRange { ability, score });
        }

        let armor = match self.armor {
            Some(armor_name) => {
                let id = tables
                    .armor_id(&armor_name)
                    .ok_or_else(|| BuilderError::UnknownArmor(armor_name.clone()))?;
                if let Some(armor) = tables.armor(id) {
                    if !rules::meets_strength_requirement(armor, abilities.strength) {
                        return Err(BuilderError::StrengthTooLow {
                            armor: armor_name,
                            required: armor.strength_requirement.unwrap_or_default(),
                            strength: abilities.strength,
                        });
                    }
                }
                Some(id)
            }
            None => None,
        };

        let weapon = match self.weapon {
            Some(weapon_name) => Some(
                tables
                    .weapon_id(&weapon_name)
                    .ok_or(BuilderError::UnknownWeapon(weapon_name))?,
            ),
            None => None,
        };

        let mut character = Character {
            name,
            level,
            class,
            subclass: self.subclass,
            background,
            race,
            alignment,
            abilities,
            speed: BASE_SPEED,
            armor,
            weapon,
            has_shield: self.has_shield,
            proficiency: 0,
            hit_points: 0,
        };
        character.refresh_derived(tables).map_err(|e| match e {
            RulesError::UnknownHitDie(_) => BuilderError::UnknownHitDie(class_name),
            other => BuilderError::UnknownClass(other.to_string()),
        })?;

        Ok(character)
    }
}

fn in_list(
    list: &'static str,
    value: Option<String>,
    options: &[String],
) -> Result<String, BuilderError> {
    let value = value.ok_or(BuilderError::Missing(list))?;
    if options.contains(&value) {
        Ok(value)
    } else {
        Err(BuilderError::NotInList { list, value })
    }
}
