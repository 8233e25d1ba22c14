//! Testing utilities for the roster.
//!
//! This module provides tools for integration testing:
//! - `ScriptedConsole` for driving the interactive flows with canned input
//! - `TestHarness` for scripted roster scenarios
//! - Assertion helpers for verifying roster state

use crate::character::{AbilityScores, Character, BASE_SPEED};
use crate::class_data::ClassId;
use crate::dice::Dice;
use crate::persist::CharacterStore;
use crate::reference::ReferenceTables;
use crate::roster::{LevelUp, Roster, RosterResult};
use crate::selection::Console;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use tracing::warn;

/// Seed used by the harness dice.
pub const TEST_SEED: u64 = 20;

/// A console that replays queued input lines and records all output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: String,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    /// Queue more input lines.
    pub fn push<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.extend(lines.into_iter().map(Into::into));
    }

    /// Everything printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take the printed output, leaving it empty.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Input lines not yet read.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

/// A level 5 human Fighter: STR 16, DEX 12, CON 14, INT 10, WIS 13, CHA 8,
/// in plate armor with a longsword and no shield.
pub fn sample_character(tables: &ReferenceTables) -> Character {
    let mut character = Character {
        name: "Aldric".to_string(),
        level: 5,
        class: tables.class_id("Fighter").unwrap_or(ClassId(0)),
        subclass: Some("Champion".to_string()),
        background: "Soldier".to_string(),
        race: "Human".to_string(),
        alignment: "Lawful Good".to_string(),
        abilities: AbilityScores::new(16, 12, 14, 10, 13, 8),
        speed: BASE_SPEED,
        armor: tables.armor_id("Plate Armor"),
        weapon: tables.weapon_id("Longsword"),
        has_shield: false,
        proficiency: 0,
        hit_points: 0,
    };
    if let Err(e) = character.refresh_derived(tables) {
        warn!(error = %e, "sample character has no derived stats");
    }
    character
}

/// Test harness for running roster scenarios.
pub struct TestHarness {
    /// The roster under test.
    pub roster: Roster,
    /// Console feeding the interactive flows.
    pub console: ScriptedConsole,
}

impl TestHarness {
    /// An empty in-memory roster with bundled tables and seeded dice.
    pub fn new() -> Self {
        let roster = Roster::new(ReferenceTables::bundled()).with_dice(Dice::seeded(TEST_SEED));
        Self {
            roster,
            console: ScriptedConsole::default(),
        }
    }

    /// A roster saving to `dir`.
    pub fn with_save_dir(dir: impl AsRef<Path>) -> Self {
        let mut harness = Self::new();
        harness.roster = harness
            .roster
            .with_store(CharacterStore::new(dir.as_ref()));
        harness
    }

    /// A roster holding the sample character.
    pub fn with_sample() -> Self {
        let mut harness = Self::new();
        let character = sample_character(harness.roster.tables());
        if let Err(e) = harness.roster.add(character) {
            warn!(error = %e, "could not add sample character");
        }
        harness
    }

    /// Queue console input.
    pub fn input<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.console.push(lines);
        self
    }

    pub fn create(&mut self) -> RosterResult<Character> {
        self.roster.create_interactive(&mut self.console)
    }

    pub fn update(&mut self, name: &str) -> RosterResult<Character> {
        self.roster.update_interactive(&mut self.console, name)
    }

    pub fn level_up(&mut self, name: &str) -> RosterResult<Option<LevelUp>> {
        self.roster.level_up_interactive(&mut self.console, name)
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.roster.registry().find_by_name(name)
    }

    pub fn output(&self) -> &str {
        self.console.output()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Console answers that create a character, starting at the name prompt.
///
/// Choices are menu numbers for the bundled tables: Fighter, Soldier,
/// Human, Lawful Good, Longsword, no shield. Armor is Plate Armor when
/// strength meets its requirement of 15, otherwise Leather Armor. A
/// subclass answer (Champion) is included when `level` is 3 or more.
pub fn fighter_answers(name: &str, level: u8, abilities: [u8; 6]) -> Vec<String> {
    let mut answers = vec![name.to_string(), level.to_string(), "5".to_string()];
    if level >= 3 {
        answers.push("1".to_string());
    }
    answers.extend(["15", "9", "1"].map(String::from));
    answers.extend(abilities.iter().map(|a| a.to_string()));
    let armor = if abilities[0] >= 15 { "13" } else { "3" };
    answers.extend([armor, "20", "0"].map(String::from));
    answers
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that the roster holds a character with the given name.
#[track_caller]
pub fn assert_has_character(harness: &TestHarness, name: &str) {
    assert!(
        harness.character(name).is_some(),
        "Expected character '{name}' to exist in the roster"
    );
}

/// Assert that the roster does NOT hold a character with the given name.
#[track_caller]
pub fn assert_no_character(harness: &TestHarness, name: &str) {
    assert!(
        harness.character(name).is_none(),
        "Expected character '{name}' to NOT exist in the roster"
    );
}

/// Assert a character's level and hit points.
#[track_caller]
pub fn assert_level_hp(harness: &TestHarness, name: &str, level: u8, hit_points: i32) {
    let character = harness
        .character(name)
        .unwrap_or_else(|| panic!("Expected character '{name}' to exist"));
    assert_eq!(
        (character.level, character.hit_points),
        (level, hit_points),
        "Expected level {level} with {hit_points} HP, got level {} with {} HP",
        character.level,
        character.hit_points
    );
}

/// Assert the console printed `text` at some point.
#[track_caller]
pub fn assert_output_contains(harness: &TestHarness, text: &str) {
    assert!(
        harness.output().contains(text),
        "Expected output to contain {text:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console() {
        let mut console = ScriptedConsole::new(["one", "two"]);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("one"));
        console.print("hello ");
        console.print("world");
        assert_eq!(console.output(), "hello world");
        assert_eq!(console.take_output(), "hello world");
        assert_eq!(console.output(), "");
        assert_eq!(console.remaining(), 1);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn test_sample_character() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        assert_eq!(character.hit_points, 52);
        assert_eq!(character.proficiency, 3);
        assert!(character.armor.is_some());
        assert!(character.weapon.is_some());
    }

    #[test]
    fn test_fighter_answers_match_tables() {
        let tables = ReferenceTables::bundled();
        assert_eq!(tables.classes[4].name, "Fighter");
        assert_eq!(tables.backgrounds[14], "Soldier");
        assert_eq!(tables.races[8], "Human");
        assert_eq!(tables.alignments[0], "Lawful Good");
        assert_eq!(tables.armors[12].name, "Plate Armor");
        assert_eq!(tables.armors[2].name, "Leather Armor");
        assert_eq!(tables.weapons[19].name, "Longsword");
    }

    #[test]
    fn test_harness_create() {
        let mut harness = TestHarness::new();
        harness.input(fighter_answers("Aldric", 5, [16, 12, 14, 10, 13, 8]));
        let character = harness.create().unwrap();

        assert_eq!(character.subclass.as_deref(), Some("Champion"));
        assert_has_character(&harness, "Aldric");
        assert_level_hp(&harness, "Aldric", 5, 52);
        assert_output_contains(&harness, "Your character's name is: Aldric");
        assert_eq!(harness.console.remaining(), 0);
    }

    #[test]
    fn test_harness_create_weak_fighter() {
        let mut harness = TestHarness::new();
        harness.input(fighter_answers("Brenna", 1, [10, 14, 12, 10, 10, 10]));
        let character = harness.create().unwrap();

        let tables = harness.roster.tables();
        assert_eq!(character.armor_name(tables), "Leather Armor");
        assert_eq!(character.weapon_name(tables), "Longsword");
        // Leather 11 + DEX 14 modifier
        assert_eq!(character.armor_class(tables), 13);
        assert!(!harness.output().contains("You do not have enough strength"));
        assert_eq!(harness.console.remaining(), 0);
    }

    #[test]
    fn test_harness_with_sample() {
        let harness = TestHarness::with_sample();
        assert_has_character(&harness, "Aldric");
        assert_no_character(&harness, "Nobody");
    }
}
