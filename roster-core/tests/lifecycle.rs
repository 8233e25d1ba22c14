//! Lifecycle tests driven through the interactive flows.
//!
//! Every scenario runs against the bundled tables with seeded dice and a
//! scripted console, so no files are touched.

use roster_core::character::AbilityScores;
use roster_core::rules::{self, RulesError};
use roster_core::testing::{
    assert_has_character, assert_level_hp, assert_no_character, assert_output_contains,
    fighter_answers, TestHarness,
};
use roster_core::{CharacterBuilder, RosterError};

// =============================================================================
// End to end
// =============================================================================

#[test]
fn test_aldric_end_to_end() {
    let mut harness = TestHarness::new();
    harness.input(fighter_answers("Aldric", 5, [16, 12, 14, 10, 13, 8]));
    harness.create().unwrap();

    assert_level_hp(&harness, "Aldric", 5, 52);
    let tables = harness.roster.tables().clone();
    let aldric = harness.character("Aldric").unwrap();
    assert_eq!(aldric.proficiency, 3);
    assert_eq!(aldric.armor_class(&tables), 18);
    assert!(!aldric.has_shield);

    harness.input(["1"]);
    let outcome = harness.level_up("Aldric").unwrap().unwrap();
    assert_eq!(outcome.level, 6);
    assert_eq!(outcome.hit_points, 60);
    assert_level_hp(&harness, "Aldric", 6, 60);
    assert_output_contains(&harness, "'Aldric' has leveled up! New level: 6");
}

#[test]
fn test_created_character_lands_at_front() {
    let mut harness = TestHarness::with_sample();
    harness.input(fighter_answers("Brenna", 1, [10, 14, 12, 10, 10, 10]));
    harness.create().unwrap();

    let names: Vec<&str> = harness
        .roster
        .registry()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Brenna", "Aldric"]);
}

// =============================================================================
// Creation validation
// =============================================================================

#[test]
fn test_create_reprompts_bad_answers() {
    let mut harness = TestHarness::with_sample();
    let mut answers = vec!["Aldric".to_string(), "R2".to_string()];
    answers.extend(fighter_answers("Brenna", 0, [16, 12, 14, 10, 13, 8]));
    // Level 0 is refused; answer again with 2.
    answers.insert(4, "2".to_string());
    harness.input(answers);

    let character = harness.create().unwrap();
    assert_eq!(character.level, 2);
    assert_output_contains(&harness, "'Aldric' already exists");
    assert_output_contains(&harness, "names cannot contain digits");
    assert_output_contains(&harness, "Invalid choice, please enter a number between 1 and 20.");
}

#[test]
fn test_subclass_locked_below_level_three() {
    let mut harness = TestHarness::new();
    harness.input(fighter_answers("Brenna", 2, [16, 12, 14, 10, 13, 8]));
    let character = harness.create().unwrap();

    assert_eq!(character.subclass, None);
    assert_eq!(character.subclass_label(), "N/A");
    assert_output_contains(&harness, "Reach level 3 to unlock Sub Classes.");
}

#[test]
fn test_weak_character_cannot_pick_plate() {
    let mut harness = TestHarness::new();
    let mut answers = fighter_answers("Brenna", 1, [12, 12, 14, 10, 13, 8]);
    // Ask for Plate Armor first, then settle for Leather Armor.
    let armor = answers.len() - 3;
    answers[armor] = "13".to_string();
    answers.insert(armor + 1, "3".to_string());
    harness.input(answers);

    let character = harness.create().unwrap();
    let tables = harness.roster.tables();
    assert_eq!(character.armor_name(tables), "Leather Armor");
    assert_output_contains(&harness, "You do not have enough strength to wield this armor!");
}

#[test]
fn test_input_closed_mid_creation_adds_nothing() {
    let mut harness = TestHarness::new();
    harness.input(["Brenna", "4"]);
    assert!(matches!(harness.create(), Err(RosterError::InputClosed)));
    assert!(harness.roster.is_empty());
}

// =============================================================================
// Level up
// =============================================================================

#[test]
fn test_level_up_declined() {
    let mut harness = TestHarness::with_sample();
    harness.input(["2"]);
    assert_eq!(harness.level_up("Aldric").unwrap(), None);
    assert_level_hp(&harness, "Aldric", 5, 52);
}

#[test]
fn test_level_up_into_subclass() {
    let mut harness = TestHarness::new();
    harness.input(fighter_answers("Brenna", 2, [16, 12, 14, 10, 13, 8]));
    harness.create().unwrap();

    harness.input(["1", "3"]);
    let outcome = harness.level_up("Brenna").unwrap().unwrap();
    assert_eq!(outcome.level, 3);
    assert_eq!(outcome.new_subclass.as_deref(), Some("Eldritch Knight"));
    assert_output_contains(&harness, "You have reached level 3!");

    let brenna = harness.character("Brenna").unwrap();
    assert_eq!(brenna.subclass.as_deref(), Some("Eldritch Knight"));
    assert_eq!(brenna.proficiency, rules::proficiency_modifier(3));
}

#[test]
fn test_level_up_unknown_name() {
    let mut harness = TestHarness::with_sample();
    assert!(matches!(
        harness.level_up("Nobody"),
        Err(RosterError::NotFound(_))
    ));
    assert_eq!(harness.console.remaining(), 0);
}

#[test]
fn test_level_up_refused_at_twenty() {
    let mut harness = TestHarness::new();
    harness.input(fighter_answers("Brenna", 20, [16, 12, 14, 10, 13, 8]));
    harness.create().unwrap();

    assert!(matches!(
        harness.level_up("Brenna"),
        Err(RosterError::ConstraintViolation(_))
    ));
    assert_level_hp(&harness, "Brenna", 20, 10 + 2 + 120 + 40);
}

// =============================================================================
// Update and delete
// =============================================================================

#[test]
fn test_update_replaces_in_place() {
    let mut harness = TestHarness::with_sample();
    harness.input(fighter_answers("Brenna", 1, [10, 10, 10, 10, 10, 10]));
    harness.create().unwrap();

    // Everything after the name, with a new level, subclass and shield.
    let mut answers = fighter_answers("Aldric", 7, [16, 12, 16, 10, 13, 8]);
    answers.remove(0);
    answers[2] = "3".to_string();
    let last = answers.len() - 1;
    answers[last] = "1".to_string();
    harness.input(answers);

    let updated = harness.update("Aldric").unwrap();
    assert_eq!(updated.level, 7);
    assert_eq!(updated.subclass.as_deref(), Some("Eldritch Knight"));
    assert!(updated.has_shield);
    assert_eq!(updated.proficiency, 3);
    // (10 + 3) + 42 + 21
    assert_level_hp(&harness, "Aldric", 7, 76);
    assert_eq!(
        harness
            .character("Aldric")
            .unwrap()
            .armor_class(harness.roster.tables()),
        20
    );

    let names: Vec<&str> = harness
        .roster
        .registry()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Brenna", "Aldric"]);
    assert_output_contains(&harness, "Character details have been updated successfully.");
}

#[test]
fn test_update_unknown_name_changes_nothing() {
    let mut harness = TestHarness::with_sample();
    let before = harness.roster.registry().clone();
    assert!(matches!(
        harness.update("Nobody"),
        Err(RosterError::NotFound(_))
    ));
    assert_eq!(harness.roster.registry(), &before);
}

#[test]
fn test_delete() {
    let mut harness = TestHarness::with_sample();
    let before = harness.roster.registry().clone();
    assert!(matches!(
        harness.roster.delete("Nobody"),
        Err(RosterError::NotFound(_))
    ));
    assert_eq!(harness.roster.registry(), &before);

    let removed = harness.roster.delete("Aldric").unwrap();
    assert_eq!(removed.name, "Aldric");
    assert_no_character(&harness, "Aldric");
    assert!(harness.roster.is_empty());
}

// =============================================================================
// Rolls and display
// =============================================================================

#[test]
fn test_finesse_weapon_uses_dexterity() {
    let mut harness = TestHarness::new();
    let tables = harness.roster.tables().clone();
    let rogue = CharacterBuilder::new()
        .name("Vex")
        .level(4)
        .class("Rogue")
        .background("Criminal")
        .race("Elf")
        .alignment("Chaotic Neutral")
        .ability_scores(AbilityScores::new(8, 18, 12, 12, 10, 14))
        .armor("Leather Armor")
        .weapon("Rapier")
        .build(&tables)
        .unwrap();
    harness.roster.add(rogue).unwrap();
    assert_has_character(&harness, "Vex");

    let attack = harness.roster.attack_roll("Vex").unwrap();
    assert_eq!(attack.modifier, 4 + 2);
    for _ in 0..50 {
        let damage = harness.roster.damage_roll("Vex").unwrap();
        assert_eq!(damage.modifier, 4);
        assert!((5..=12).contains(&damage.total));
    }
}

#[test]
fn test_missing_weapon_reports_error() {
    let mut harness = TestHarness::with_sample();
    let mut aldric = harness.character("Aldric").unwrap().clone();
    aldric.weapon = None;
    harness.roster.replace("Aldric", aldric).unwrap();

    assert!(matches!(
        harness.roster.damage_roll("Aldric"),
        Err(RosterError::Rules(RulesError::NoWeapon))
    ));
}

#[test]
fn test_sheets_newest_first() {
    let mut harness = TestHarness::with_sample();
    assert!(TestHarness::new().roster.sheets().is_empty());

    harness.input(fighter_answers("Brenna", 1, [10, 10, 10, 10, 10, 10]));
    harness.create().unwrap();

    let sheets = harness.roster.sheets();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].name, "Brenna");
    assert_eq!(sheets[1].armor_class, 18);
    assert_eq!(harness.roster.sheet("Aldric").unwrap().hit_points, 52);
}
