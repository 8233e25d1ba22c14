//! Character lifecycle operations.
//!
//! A [`Roster`] owns the reference tables, the registry, the session dice
//! and, when configured, the on-disk store. Every change to a character is
//! made on a copy, its derived stats recomputed, and only then written back
//! to the registry and saved.

use crate::character::{Ability, Character, MAX_LEVEL};
use crate::character_builder::{BuilderError, CharacterBuilder};
use crate::class_data::{ClassEntry, SUBCLASS_LEVEL};
use crate::config::RosterConfig;
use crate::dice::{Dice, RollResult};
use crate::persist::{self, CharacterStore, PersistError};
use crate::reference::ReferenceTables;
use crate::registry::Registry;
use crate::rules::{self, RulesError};
use crate::selection::{self, Console, SelectionError};
use crate::sheet::CharacterSheet;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Errors from roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Character not found: {0}")]
    NotFound(String),

    #[error("A character named {0} already exists")]
    DuplicateName(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("Input closed")]
    InputClosed,

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<SelectionError> for RosterError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::InputClosed => RosterError::InputClosed,
            SelectionError::Io(e) => RosterError::Io(e),
            SelectionError::NoOptions(list) => {
                RosterError::InvalidReference(format!("no {list} options are loaded"))
            }
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Outcome of a level-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub name: String,
    pub level: u8,
    pub hit_points: i32,
    pub proficiency: i32,
    /// Set when this level-up unlocked the subclass.
    pub new_subclass: Option<String>,
}

#[derive(Debug)]
pub struct Roster {
    tables: ReferenceTables,
    registry: Registry,
    dice: Dice,
    store: Option<CharacterStore>,
}

impl Roster {
    /// An empty in-memory roster with clock-seeded dice.
    pub fn new(tables: ReferenceTables) -> Self {
        Self {
            tables,
            registry: Registry::new(),
            dice: Dice::from_time(),
            store: None,
        }
    }

    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice = dice;
        self
    }

    pub fn with_store(mut self, store: CharacterStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Load tables and saved characters as configured.
    pub fn open(config: &RosterConfig) -> RosterResult<Self> {
        let tables = match &config.data_dir {
            Some(dir) => ReferenceTables::load_dir(dir),
            None => ReferenceTables::bundled(),
        };
        let dice = config.seed.map_or_else(Dice::from_time, Dice::seeded);
        let mut roster = Roster::new(tables).with_dice(dice);

        if let Some(dir) = &config.save_dir {
            let store = CharacterStore::new(dir);
            roster.registry = store.load_all(&roster.tables)?;
            roster.store = Some(store);
        }
        info!(characters = roster.registry.len(), "roster opened");
        Ok(roster)
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> Option<&CharacterStore> {
        self.store.as_ref()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn find(&self, name: &str) -> RosterResult<&Character> {
        self.registry
            .find_by_name(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))
    }

    pub fn sheet(&self, name: &str) -> RosterResult<CharacterSheet> {
        Ok(CharacterSheet::new(self.find(name)?, &self.tables))
    }

    /// Sheets for every character, newest first.
    pub fn sheets(&self) -> Vec<CharacterSheet> {
        self.registry
            .iter()
            .map(|c| CharacterSheet::new(c, &self.tables))
            .collect()
    }

    /// Whether `name` is in use, either exactly or by a character whose
    /// save file would have the same name.
    pub fn is_name_taken(&self, name: &str) -> bool {
        let file_name = persist::character_file_name(name);
        self.registry
            .iter()
            .any(|c| c.name == name || persist::character_file_name(&c.name) == file_name)
    }

    /// Insert a new character at the front and save it.
    pub fn add(&mut self, character: Character) -> RosterResult<()> {
        if self.is_name_taken(&character.name) {
            return Err(RosterError::DuplicateName(character.name));
        }
        self.persist(&character);
        info!(name = %character.name, "character created");
        self.registry.insert_front(character);
        Ok(())
    }

    /// Replace a character in place and save it. The name cannot change.
    pub fn replace(&mut self, name: &str, mut character: Character) -> RosterResult<()> {
        if character.name != name {
            return Err(RosterError::ConstraintViolation(format!(
                "cannot rename {name} to {}",
                character.name
            )));
        }
        character.refresh_derived(&self.tables)?;
        let slot = self
            .registry
            .find_by_name_mut(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        *slot = character;
        if let Some(updated) = self.registry.find_by_name(name) {
            self.persist(updated);
        }
        info!(name, "character updated");
        Ok(())
    }

    /// Raise a character one level.
    ///
    /// Reaching level 3 asks `choose_subclass` for one of the class's
    /// subclasses. Nothing changes if any step fails.
    pub fn level_up<F>(&mut self, name: &str, choose_subclass: F) -> RosterResult<LevelUp>
    where
        F: FnOnce(&ClassEntry) -> RosterResult<String>,
    {
        let mut character = self.find(name)?.clone();
        if character.level >= MAX_LEVEL {
            return Err(RosterError::ConstraintViolation(format!(
                "{name} is already at the maximum level of {MAX_LEVEL}"
            )));
        }

        character.level += 1;
        let mut new_subclass = None;
        if character.level == SUBCLASS_LEVEL {
            let entry = self.tables.class(character.class).ok_or_else(|| {
                RosterError::InvalidReference(format!("class of {name} is not loaded"))
            })?;
            let subclass = choose_subclass(entry)?;
            if !entry.has_subclass(&subclass) {
                return Err(RosterError::InvalidReference(format!(
                    "{} has no subclass {subclass}",
                    entry.name
                )));
            }
            character.subclass = Some(subclass.clone());
            new_subclass = Some(subclass);
        }
        character.refresh_derived(&self.tables)?;

        let outcome = LevelUp {
            name: character.name.clone(),
            level: character.level,
            hit_points: character.hit_points,
            proficiency: character.proficiency,
            new_subclass,
        };
        self.replace(name, character)?;
        info!(name, level = outcome.level, "character leveled up");
        Ok(outcome)
    }

    /// Remove a character and its saved file.
    pub fn delete(&mut self, name: &str) -> RosterResult<Character> {
        let character = self
            .registry
            .remove_by_name(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(name) {
                error!(name, error = %e, "failed to remove saved character");
            }
        }
        info!(name, "character deleted");
        Ok(character)
    }

    pub fn roll_d20(&mut self) -> RollResult {
        self.dice.d20_plus(0)
    }

    pub fn roll_with_modifier(
        &mut self,
        name: &str,
        ability: Option<Ability>,
    ) -> RosterResult<RollResult> {
        let character = self
            .registry
            .find_by_name(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        Ok(rules::roll_with_modifier(character, ability, &mut self.dice))
    }

    pub fn attack_roll(&mut self, name: &str) -> RosterResult<RollResult> {
        let character = self
            .registry
            .find_by_name(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        let weapon = character.weapon.and_then(|id| self.tables.weapon(id));
        Ok(rules::attack_roll(character, weapon, &mut self.dice)?)
    }

    pub fn damage_roll(&mut self, name: &str) -> RosterResult<RollResult> {
        let character = self
            .registry
            .find_by_name(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        let weapon = character.weapon.and_then(|id| self.tables.weapon(id));
        Ok(rules::damage_roll(character, weapon, &mut self.dice)?)
    }

    /// Write every character sheet to `path` as JSON.
    pub fn export_json(&self, path: impl AsRef<Path>) -> RosterResult<()> {
        persist::export_json(self.registry.iter(), &self.tables, path)?;
        Ok(())
    }

    fn persist(&self, character: &Character) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(character, &self.tables) {
                error!(name = %character.name, error = %e, "failed to save character");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Interactive flows
    // ------------------------------------------------------------------------

    /// Ask for every choice of a new character, then add it.
    pub fn create_interactive(&mut self, console: &mut dyn Console) -> RosterResult<Character> {
        let name = selection::select_name(console, |n| self.is_name_taken(n))?;
        let character = self.collect_choices(console, CharacterBuilder::new().name(name))?;
        self.add(character.clone())?;
        Ok(character)
    }

    /// Ask again for every choice except the name, then replace the record.
    pub fn update_interactive(
        &mut self,
        console: &mut dyn Console,
        name: &str,
    ) -> RosterResult<Character> {
        let existing = self.find(name)?;
        let builder = CharacterBuilder::from_character(existing, &self.tables);
        console.print(&format!(
            "Enter updated details for your character: {name}:\n"
        ));
        let character = self.collect_choices(console, builder)?;
        self.replace(name, character.clone())?;
        console.print("Character details have been updated successfully.\n\n");
        Ok(character)
    }

    /// Confirm, then level up. `Ok(None)` when the user declines.
    pub fn level_up_interactive(
        &mut self,
        console: &mut dyn Console,
        name: &str,
    ) -> RosterResult<Option<LevelUp>> {
        let character = self.find(name)?;
        if character.level >= MAX_LEVEL {
            return Err(RosterError::ConstraintViolation(format!(
                "{name} is already at the maximum level of {MAX_LEVEL}"
            )));
        }
        let question = format!("Are you sure you want to level up '{name}'?");
        if !selection::confirm(console, &question)? {
            return Ok(None);
        }

        let outcome = self.level_up(name, |entry| {
            console.print(&format!(
                "You have reached level 3! It's time to choose a subclass for '{name}'.\n"
            ));
            Ok(selection::choose_subclass(console, entry)?)
        })?;
        console.print(&format!(
            "\n'{}' has leveled up! New level: {}\n\n",
            outcome.name, outcome.level
        ));
        Ok(Some(outcome))
    }

    fn collect_choices(
        &self,
        console: &mut dyn Console,
        builder: CharacterBuilder,
    ) -> RosterResult<Character> {
        let tables = &self.tables;
        let level = selection::select_level(console)?;
        let class = selection::select_class(console, tables)?;
        let subclass = selection::select_subclass(console, tables, class, level)?;
        let background = selection::select_from_list(console, "background", &tables.backgrounds)?;
        let race = selection::select_from_list(console, "race", &tables.races)?;
        let alignment = selection::select_from_list(console, "alignment", &tables.alignments)?;
        let abilities = selection::select_abilities(console, tables)?;
        let armor = selection::select_armor(console, tables, abilities.strength)?;
        let weapon = selection::select_weapon(console, tables)?;
        let has_shield = selection::select_shield(console)?;

        let name_of = |found: Option<&str>, what: &str| {
            found
                .map(str::to_string)
                .ok_or_else(|| RosterError::InvalidReference(format!("selected {what} is not loaded")))
        };
        let class_name = name_of(tables.class(class).map(|c| c.name.as_str()), "class")?;
        let armor_name = name_of(tables.armor(armor).map(|a| a.name.as_str()), "armor")?;
        let weapon_name = name_of(tables.weapon(weapon).map(|w| w.name.as_str()), "weapon")?;

        let builder = builder
            .level(level)
            .class(class_name)
            .background(background)
            .race(race)
            .alignment(alignment)
            .ability_scores(abilities)
            .armor(armor_name)
            .weapon(weapon_name)
            .shield(has_shield);
        let builder = match subclass {
            Some(subclass) => builder.subclass(subclass),
            None => builder.no_subclass(),
        };
        Ok(builder.build(tables)?)
    }
}
