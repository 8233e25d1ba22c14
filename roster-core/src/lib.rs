//! D&D 5e character roster engine.
//!
//! This crate provides:
//! - Read-only reference tables for classes, races, armor and weapons
//! - A rules engine for modifiers, armor class, hit points and rolls
//! - An in-memory character registry with create, update, level-up and delete
//! - Plain-text character files with an index, plus JSON export
//!
//! # Quick Start
//!
//! ```no_run
//! use roster_core::{CharacterBuilder, Roster, RosterConfig, AbilityScores};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut roster = Roster::open(&RosterConfig::new().with_save_dir("characters"))?;
//!
//!     let character = CharacterBuilder::new()
//!         .name("Aldric")
//!         .level(5)
//!         .class("Fighter")
//!         .subclass("Champion")
//!         .background("Soldier")
//!         .race("Human")
//!         .alignment("Lawful Good")
//!         .ability_scores(AbilityScores::new(16, 12, 14, 10, 13, 8))
//!         .armor("Plate Armor")
//!         .weapon("Longsword")
//!         .build(roster.tables())?;
//!     roster.add(character)?;
//!
//!     let outcome = roster.level_up("Aldric", |class| Ok(class.subclasses[0].clone()))?;
//!     println!("Level {} with {} HP", outcome.level, outcome.hit_points);
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod config;
pub mod dice;
pub mod items;
pub mod persist;
pub mod reference;
pub mod registry;
pub mod roster;
pub mod rules;
pub mod selection;
pub mod sheet;
pub mod testing;

// Primary public API
pub use character::{Ability, AbilityScores, Character};
pub use character_builder::{BuilderError, CharacterBuilder};
pub use class_data::{CharacterClass, ClassEntry, ClassId};
pub use config::RosterConfig;
pub use dice::{Dice, DieType, RollResult};
pub use items::{ArmorId, ArmorItem, WeaponId, WeaponItem};
pub use persist::{CharacterStore, PersistError};
pub use reference::{ReferenceError, ReferenceTables};
pub use registry::Registry;
pub use roster::{LevelUp, Roster, RosterError};
pub use rules::RulesError;
pub use selection::{Console, SelectionError};
pub use sheet::CharacterSheet;
pub use testing::{ScriptedConsole, TestHarness};
