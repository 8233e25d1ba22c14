//! Interactive selection steps.
//!
//! Each step prints its prompt to a [`Console`], reads answers until one is
//! valid, and returns the choice. Invalid answers are reported and asked
//! again; only a closed input or an I/O failure ends a step early.

use crate::character::{
    validate_name, Ability, AbilityScores, NameError, MAX_ABILITY_SCORE, MAX_LEVEL,
    MIN_ABILITY_SCORE, MIN_LEVEL,
};
use crate::class_data::{ClassEntry, ClassId, SUBCLASS_LEVEL};
use crate::items::{ArmorId, WeaponId};
use crate::reference::ReferenceTables;
use crate::rules;
use crate::sheet;
use std::io;
use thiserror::Error;

/// Line-oriented input and output for the interactive flows.
pub trait Console {
    /// Read one line without its line ending. `Ok(None)` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn print(&mut self, text: &str);
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("input closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no {0} options are loaded")]
    NoOptions(&'static str),
}

pub type SelectionResult<T> = Result<T, SelectionError>;

/// Print `prompt` and read one trimmed line.
pub fn prompt_line(console: &mut dyn Console, prompt: &str) -> SelectionResult<String> {
    console.print(prompt);
    match console.read_line()? {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(SelectionError::InputClosed),
    }
}

/// Ask until the answer is a whole number in `floor..=ceiling`.
pub fn prompt_number(
    console: &mut dyn Console,
    prompt: &str,
    floor: i64,
    ceiling: i64,
) -> SelectionResult<i64> {
    loop {
        let line = prompt_line(console, prompt)?;
        match line.parse::<i64>() {
            Err(_) => console.print("Invalid input. Please enter a number.\n\n"),
            Ok(n) if n < floor || n > ceiling => console.print(&format!(
                "Invalid choice, please enter a number between {floor} and {ceiling}.\n\n"
            )),
            Ok(n) => return Ok(n),
        }
    }
}

/// Print a numbered list and return the zero-based index chosen.
fn choose_index<S: AsRef<str>>(
    console: &mut dyn Console,
    heading: &str,
    options: &[S],
) -> SelectionResult<usize> {
    let mut menu = format!("{heading}\n");
    for (i, option) in options.iter().enumerate() {
        menu.push_str(&format!("{}. {}\n", i + 1, option.as_ref()));
    }
    console.print(&menu);
    let choice = prompt_number(console, "Enter your Choice: ", 1, options.len() as i64)?;
    Ok(choice as usize - 1)
}

/// Ask for a name that is valid and not taken.
pub fn select_name(
    console: &mut dyn Console,
    is_taken: impl Fn(&str) -> bool,
) -> SelectionResult<String> {
    loop {
        let name = prompt_line(console, "Enter your character's name: ")?;
        match validate_name(&name) {
            Err(NameError::ContainsDigit) => {
                console.print("Invalid name, names cannot contain digits...\n\n")
            }
            Err(NameError::Empty) => console.print("Invalid name, names cannot be empty...\n\n"),
            Err(NameError::TooLong) => {
                console.print("Invalid name, names can be at most 24 characters...\n\n")
            }
            Ok(()) if is_taken(&name) => console.print(&format!(
                "A character named '{name}' already exists, please choose another name.\n\n"
            )),
            Ok(()) => {
                console.print(&format!("\nYour character's name is: {name}\n\n"));
                return Ok(name);
            }
        }
    }
}

pub fn select_level(console: &mut dyn Console) -> SelectionResult<u8> {
    let level = prompt_number(
        console,
        "Enter your character's level (1-20): ",
        i64::from(MIN_LEVEL),
        i64::from(MAX_LEVEL),
    )? as u8;
    console.print(&format!("Your character is level: {level}\n\n"));
    Ok(level)
}

/// Ask for a class. Classes without a known hit die are refused.
pub fn select_class(
    console: &mut dyn Console,
    tables: &ReferenceTables,
) -> SelectionResult<ClassId> {
    if tables.classes.is_empty() {
        return Err(SelectionError::NoOptions("class"));
    }
    let names: Vec<&str> = tables.classes.iter().map(|c| c.name.as_str()).collect();
    loop {
        let index = choose_index(console, "Enter your character's class:", &names)?;
        let entry = &tables.classes[index];
        if entry.hit_die().is_none() {
            console.print(&format!(
                "{} has no known hit die, please choose another class.\n\n",
                entry.name
            ));
            continue;
        }
        console.print(&format!("You selected: {}\n\n", entry.name));
        return Ok(ClassId(index));
    }
}

/// Ask for a subclass when `level` allows one.
pub fn select_subclass(
    console: &mut dyn Console,
    tables: &ReferenceTables,
    class: ClassId,
    level: u8,
) -> SelectionResult<Option<String>> {
    if level < SUBCLASS_LEVEL {
        console.print("Reach level 3 to unlock Sub Classes.\n\n");
        return Ok(None);
    }
    let entry = tables
        .class(class)
        .ok_or(SelectionError::NoOptions("subclass"))?;
    choose_subclass(console, entry).map(Some)
}

/// Ask for one of the class's subclasses.
pub fn choose_subclass(console: &mut dyn Console, entry: &ClassEntry) -> SelectionResult<String> {
    let index = choose_index(console, "Enter your character's sub class:", &entry.subclasses)?;
    let subclass = entry.subclasses[index].clone();
    console.print(&format!("You selected: {subclass}\n\n"));
    Ok(subclass)
}

/// Ask for one entry of a closed list such as races or alignments.
pub fn select_from_list(
    console: &mut dyn Console,
    label: &'static str,
    options: &[String],
) -> SelectionResult<String> {
    if options.is_empty() {
        return Err(SelectionError::NoOptions(label));
    }
    let heading = format!("Enter your character's {label}:");
    let index = choose_index(console, &heading, options)?;
    let choice = options[index].clone();
    console.print(&format!("You selected: {choice}\n\n"));
    Ok(choice)
}

/// Ask for the six ability scores, labelled from the attribute table.
pub fn select_abilities(
    console: &mut dyn Console,
    tables: &ReferenceTables,
) -> SelectionResult<AbilityScores> {
    let mut scores = AbilityScores::default();
    for (i, ability) in Ability::all().into_iter().enumerate() {
        let label = tables
            .attributes
            .get(i)
            .map_or(ability.name(), String::as_str);
        let prompt = format!(
            "Enter your character's {label} value ({MIN_ABILITY_SCORE}-{MAX_ABILITY_SCORE}): "
        );
        let value = prompt_number(
            console,
            &prompt,
            i64::from(MIN_ABILITY_SCORE),
            i64::from(MAX_ABILITY_SCORE),
        )? as u8;
        scores.set(ability, value);
        console.print(&format!("Your character has {value} {label}!\n"));
    }
    console.print("\n");
    Ok(scores)
}

/// Ask for armor the character is strong enough to wear.
pub fn select_armor(
    console: &mut dyn Console,
    tables: &ReferenceTables,
    strength: u8,
) -> SelectionResult<ArmorId> {
    if tables.armors.is_empty() {
        return Err(SelectionError::NoOptions("armor"));
    }
    loop {
        console.print(&format!("Select Your Armor:\n{}", sheet::armor_table(tables)));
        let choice = prompt_number(console, "Enter your choice: ", 1, tables.armors.len() as i64)?;
        let armor = &tables.armors[choice as usize - 1];
        if !rules::meets_strength_requirement(armor, strength) {
            console.print(
                "\nYou do not have enough strength to wield this armor! Please try again.\n\n",
            );
            continue;
        }
        console.print(&format!("You selected: {}\n\n", armor.name));
        return Ok(ArmorId(choice as usize - 1));
    }
}

pub fn select_weapon(
    console: &mut dyn Console,
    tables: &ReferenceTables,
) -> SelectionResult<WeaponId> {
    if tables.weapons.is_empty() {
        return Err(SelectionError::NoOptions("weapon"));
    }
    console.print(&format!(
        "Select Your Weapon(s):\n{}",
        sheet::weapon_table(tables)
    ));
    let choice = prompt_number(console, "Enter your choice: ", 1, tables.weapons.len() as i64)?;
    let index = choice as usize - 1;
    console.print(&format!("You selected: {}\n\n", tables.weapons[index].name));
    Ok(WeaponId(index))
}

pub fn select_shield(console: &mut dyn Console) -> SelectionResult<bool> {
    console.print("Is your character holding a shield? (1: yes | 0: no)\n");
    let has_shield = prompt_number(console, "Enter your Choice: ", 0, 1)? == 1;
    if has_shield {
        console.print("Your character is now holding a shield!\n\n");
    } else {
        console.print("Your character is not holding a shield!\n\n");
    }
    Ok(has_shield)
}

/// Ask a yes/no question, numbered 1 for yes and 2 for no.
pub fn confirm(console: &mut dyn Console, question: &str) -> SelectionResult<bool> {
    console.print(&format!("{question}\n1. Yes\n2. No\n"));
    Ok(prompt_number(console, "Enter your Choice: ", 1, 2)? == 1)
}

/// Ask which ability modifier to add to a roll. 7 means none.
pub fn select_ability_or_none(console: &mut dyn Console) -> SelectionResult<Option<Ability>> {
    let mut menu = String::from("Enter which modifier to add on to your roll:\n");
    for (i, ability) in Ability::all().iter().enumerate() {
        menu.push_str(&format!("{}. {}\n", i + 1, ability.name()));
    }
    menu.push_str("7. None\n");
    console.print(&menu);
    let choice = prompt_number(console, "Enter your choice: ", 1, 7)?;
    Ok(Ability::from_menu_index(choice))
}
