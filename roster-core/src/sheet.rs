//! Character sheets and catalog tables for display.

use crate::character::{Ability, Character};
use crate::reference::ReferenceTables;
use serde::Serialize;
use std::fmt;

/// One ability line of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityLine {
    pub ability: Ability,
    pub score: u8,
    pub modifier: i32,
}

/// Everything shown for one character, with names resolved and armor class
/// computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSheet {
    pub name: String,
    pub level: u8,
    pub class: String,
    pub subclass: String,
    pub background: String,
    pub race: String,
    pub alignment: String,
    pub hit_points: i32,
    pub speed: u32,
    pub proficiency: i32,
    pub armor: String,
    pub armor_class: i32,
    pub weapon: String,
    pub shield: bool,
    pub abilities: Vec<AbilityLine>,
}

impl CharacterSheet {
    pub fn new(character: &Character, tables: &ReferenceTables) -> Self {
        Self {
            name: character.name.clone(),
            level: character.level,
            class: character.class_name(tables).to_string(),
            subclass: character.subclass_label().to_string(),
            background: character.background.clone(),
            race: character.race.clone(),
            alignment: character.alignment.clone(),
            hit_points: character.hit_points,
            speed: character.speed,
            proficiency: character.proficiency,
            armor: character.armor_name(tables).to_string(),
            armor_class: character.armor_class(tables),
            weapon: character.weapon_name(tables).to_string(),
            shield: character.has_shield,
            abilities: Ability::all()
                .into_iter()
                .map(|ability| AbilityLine {
                    ability,
                    score: character.abilities.get(ability),
                    modifier: character.modifier(ability),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CharacterSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    ___________ Name: {} ___________\n", self.name)?;
        writeln!(
            f,
            "Class: {}   Level: {}   Background: {}\n",
            self.class, self.level, self.background
        )?;
        writeln!(
            f,
            "Sub Class: {}   Race: {}    Alignment: {}\n",
            self.subclass, self.race, self.alignment
        )?;
        writeln!(
            f,
            "Armor: {}   Armor Class: {}     Weapon: {}   Shield: {}\n",
            self.armor,
            self.armor_class,
            self.weapon,
            if self.shield { "Yes" } else { "No" }
        )?;
        writeln!(
            f,
            "Total HP: {}    Speed: {}    Proficiency Modifier: {}\n",
            self.hit_points, self.speed, self.proficiency
        )?;
        for line in &self.abilities {
            writeln!(
                f,
                "{}\nAbility Score: {}\nModifier: {}\n",
                line.ability.name(),
                line.score,
                line.modifier
            )?;
        }
        Ok(())
    }
}

const ARMOR_RULE: &str =
    "-------------------------------------------------------------------------------------\n";
const WEAPON_RULE: &str =
    "----------------------------------------------------------------------------------------------------------\n";

/// Numbered armor catalog.
pub fn armor_table(tables: &ReferenceTables) -> String {
    let mut out = String::from(ARMOR_RULE);
    out.push_str(&format!(
        "    {:<22} | {:<7} | {:<3} | {:<8} | {:<12} | {:<15}\n",
        "Name", "Type", "AC", "Dex Mod.", "Stealth", "Requirements"
    ));
    out.push_str(ARMOR_RULE);
    for (i, armor) in tables.armors.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<22} | {:<7} | {:<3} | {:<8} | {:<12} | {:<15}\n",
            i + 1,
            armor.name,
            armor.category.name(),
            armor.base_ac,
            armor.dex_cap_label(),
            armor.stealth_label(),
            armor.requirement_label()
        ));
    }
    out.push_str(ARMOR_RULE);
    out
}

/// Numbered weapon catalog.
pub fn weapon_table(tables: &ReferenceTables) -> String {
    let mut out = String::from(WEAPON_RULE);
    out.push_str(&format!(
        "    {:<16} | {:<13} | {:<11} | {:<8} | {:<8} | {:<9} | {:<10}\n",
        "Name", "Type", "DMG type", "DMG dice", "Finesse", "Versatile", "Range"
    ));
    out.push_str(WEAPON_RULE);
    for (i, weapon) in tables.weapons.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<16} | {:<13} | {:<11} | {:<8} | {:<8} | {:<9} | {:<10}\n",
            i + 1,
            weapon.name,
            weapon.category.name(),
            weapon.damage_type.name(),
            weapon.damage_dice,
            weapon.finesse_label(),
            weapon.versatile_label(),
            weapon.range_label()
        ));
    }
    out.push_str(WEAPON_RULE);
    out
}
