//! Rules engine: derived statistics and rolls.
//!
//! Everything here is a pure function of its inputs, apart from the dice
//! passed in for rolls.

use crate::character::{Ability, Character};
use crate::dice::{DamageDice, Dice, DieType, RollResult};
use crate::items::{ArmorCategory, ArmorItem, WeaponItem};
use crate::reference::ReferenceTables;
use thiserror::Error;
use tracing::warn;

/// Bonus a shield adds to armor class.
pub const SHIELD_BONUS: i32 = 2;

/// Armor class reported when the armor cannot be found.
pub const DEFAULT_ARMOR_CLASS: i32 = 10;

/// Errors from rules computations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("no weapon equipped")]
    NoWeapon,

    #[error("unknown damage dice: {0}")]
    UnknownDamageDice(String),

    #[error("no hit die known for {0}")]
    UnknownHitDie(String),
}

/// `(score - 10) / 2`, truncated toward zero.
///
/// This is not the PHB table for odd scores below 10: 9 gives 0, not -1.
pub fn ability_modifier(score: u8) -> i32 {
    (i32::from(score) - 10) / 2
}

pub fn proficiency_modifier(level: u8) -> i32 {
    (i32::from(level) - 1) / 4 + 2
}

/// Armor class for a given dexterity, armor and shield.
pub fn armor_class(dexterity: u8, armor: &ArmorItem, has_shield: bool) -> i32 {
    let dex_mod = ability_modifier(dexterity);
    let dex_bonus = match armor.category {
        ArmorCategory::Heavy => 0,
        _ => match armor.max_dex_bonus {
            Some(cap) if armor.requires_dex_cap => dex_mod.min(cap),
            _ => dex_mod,
        },
    };
    let shield = if has_shield { SHIELD_BONUS } else { 0 };
    armor.base_ac + dex_bonus + shield
}

/// Armor class looked up by armor name. Unknown armor gives the default.
pub fn armor_class_by_name(
    tables: &ReferenceTables,
    dexterity: u8,
    armor_name: &str,
    has_shield: bool,
) -> i32 {
    match tables.armor_by_name(armor_name) {
        Some(armor) => armor_class(dexterity, armor, has_shield),
        None => {
            warn!(armor = armor_name, "armor not found, using default AC");
            DEFAULT_ARMOR_CLASS
        }
    }
}

/// Hit points for a hit die, constitution score and level.
///
/// `(base + con) + (per_level * level) + (con * level)`, where `base` is the
/// die size and `per_level` is the PHB fixed value for that die.
pub fn hit_points(hit_die: DieType, constitution: u8, level: u8) -> Result<i32, RulesError> {
    let (base, per_level) = match hit_die {
        DieType::D6 => (6, 4),
        DieType::D8 => (8, 5),
        DieType::D10 => (10, 6),
        DieType::D12 => (12, 7),
        other => return Err(RulesError::UnknownHitDie(other.to_string())),
    };
    let con = ability_modifier(constitution);
    let level = i32::from(level);
    Ok((base + con) + (per_level * level) + (con * level))
}

/// Ability used for attack rolls with a weapon.
pub fn attack_ability(weapon: &WeaponItem) -> Ability {
    if weapon.is_finesse() || weapon.is_ranged() {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

/// Ability used for damage rolls with a weapon.
pub fn damage_ability(weapon: &WeaponItem) -> Ability {
    if weapon.is_finesse() {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

/// d20 plus the attack ability modifier plus proficiency.
pub fn attack_roll(
    character: &Character,
    weapon: Option<&WeaponItem>,
    dice: &mut Dice,
) -> Result<RollResult, RulesError> {
    let weapon = weapon.ok_or(RulesError::NoWeapon)?;
    let modifier = character.modifier(attack_ability(weapon)) + character.proficiency;
    Ok(dice.d20_plus(modifier))
}

/// Roll the weapon's one-handed damage dice.
pub fn damage_die_roll(weapon: &WeaponItem, dice: &mut Dice) -> Result<RollResult, RulesError> {
    let damage: DamageDice = weapon
        .damage_dice
        .parse()
        .map_err(|_| RulesError::UnknownDamageDice(weapon.damage_dice.clone()))?;
    Ok(damage.roll(dice))
}

/// Damage dice plus the damage ability modifier.
///
/// Versatile weapons always roll their one-handed dice.
pub fn damage_roll(
    character: &Character,
    weapon: Option<&WeaponItem>,
    dice: &mut Dice,
) -> Result<RollResult, RulesError> {
    let weapon = weapon.ok_or(RulesError::NoWeapon)?;
    let roll = damage_die_roll(weapon, dice)?;
    Ok(roll.with_modifier(character.modifier(damage_ability(weapon))))
}

/// d20 plus the chosen ability modifier, or a plain d20.
pub fn roll_with_modifier(
    character: &Character,
    ability: Option<Ability>,
    dice: &mut Dice,
) -> RollResult {
    let modifier = ability.map_or(0, |a| character.modifier(a));
    dice.d20_plus(modifier)
}

pub fn meets_strength_requirement(armor: &ArmorItem, strength: u8) -> bool {
    armor
        .strength_requirement
        .map_or(true, |required| strength >= required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_character;

    #[test]
    fn test_ability_modifier_truncates() {
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), 0);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn test_proficiency_by_level() {
        let expected = [
            (1, 2),
            (4, 2),
            (5, 3),
            (8, 3),
            (9, 4),
            (12, 4),
            (13, 5),
            (16, 5),
            (17, 6),
            (20, 6),
        ];
        for (level, bonus) in expected {
            assert_eq!(proficiency_modifier(level), bonus, "level {level}");
        }
    }

    #[test]
    fn test_hit_points_formula() {
        // Fighter 5, CON 14: (10 + 2) + 30 + 10
        assert_eq!(hit_points(DieType::D10, 14, 5), Ok(52));
        assert_eq!(hit_points(DieType::D10, 14, 6), Ok(60));
        // Wizard 1, CON 8: (6 - 1) + 4 - 1
        assert_eq!(hit_points(DieType::D6, 8, 1), Ok(8));
        assert_eq!(hit_points(DieType::D8, 10, 3), Ok(23));
        assert_eq!(hit_points(DieType::D12, 20, 20), Ok(257));
        assert_eq!(
            hit_points(DieType::D20, 10, 1),
            Err(RulesError::UnknownHitDie("d20".to_string()))
        );
    }

    #[test]
    fn test_armor_class_rules() {
        let tables = ReferenceTables::bundled();
        let plate = tables.armor_by_name("Plate Armor").unwrap();
        let leather = tables.armor_by_name("Leather Armor").unwrap();
        let half_plate = tables.armor_by_name("Half Plate Armor").unwrap();

        // Heavy armor ignores dexterity.
        assert_eq!(armor_class(12, plate, false), 18);
        assert_eq!(armor_class(20, plate, true), 20);
        assert_eq!(armor_class(8, plate, false), 18);

        // Light armor takes the full modifier.
        assert_eq!(armor_class(20, leather, false), 16);
        assert_eq!(armor_class(8, leather, false), 10);

        // Medium armor caps it.
        assert_eq!(armor_class(18, half_plate, false), 17);
        assert_eq!(armor_class(12, half_plate, true), 18);
        assert_eq!(armor_class(8, half_plate, false), 14);
    }

    #[test]
    fn test_armor_class_unknown_name() {
        let tables = ReferenceTables::bundled();
        assert_eq!(
            armor_class_by_name(&tables, 20, "Dragon Scale", true),
            DEFAULT_ARMOR_CLASS
        );
        assert_eq!(armor_class_by_name(&tables, 14, "Studded Leather Armor", true), 16);
    }

    #[test]
    fn test_attack_and_damage_abilities() {
        let tables = ReferenceTables::bundled();
        let rapier = tables.weapon_by_name("Rapier").unwrap();
        let longbow = tables.weapon_by_name("Longbow").unwrap();
        let longsword = tables.weapon_by_name("Longsword").unwrap();
        let javelin = tables.weapon_by_name("Javelin").unwrap();

        assert_eq!(attack_ability(rapier), Ability::Dexterity);
        assert_eq!(damage_ability(rapier), Ability::Dexterity);
        assert_eq!(attack_ability(longbow), Ability::Dexterity);
        assert_eq!(damage_ability(longbow), Ability::Strength);
        assert_eq!(attack_ability(longsword), Ability::Strength);
        assert_eq!(attack_ability(javelin), Ability::Strength);
    }

    #[test]
    fn test_attack_roll_bounds() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let weapon = tables.weapon_by_name("Longsword");
        let mut dice = Dice::seeded(5);
        let modifier = character.modifier(Ability::Strength) + character.proficiency;

        for _ in 0..100 {
            let roll = attack_roll(&character, weapon, &mut dice).unwrap();
            assert_eq!(roll.modifier, modifier);
            assert!((1 + modifier..=20 + modifier).contains(&roll.total));
        }
    }

    #[test]
    fn test_rolls_without_weapon() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let mut dice = Dice::seeded(5);
        assert_eq!(
            attack_roll(&character, None, &mut dice),
            Err(RulesError::NoWeapon)
        );
        assert_eq!(
            damage_roll(&character, None, &mut dice),
            Err(RulesError::NoWeapon)
        );
    }

    #[test]
    fn test_damage_roll_uses_one_handed_dice() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let longsword = tables.weapon_by_name("Longsword").unwrap();
        let str_mod = character.modifier(Ability::Strength);
        let mut dice = Dice::seeded(11);

        for _ in 0..200 {
            let roll = damage_roll(&character, Some(longsword), &mut dice).unwrap();
            assert_eq!(roll.die_type, DieType::D8);
            assert!((1 + str_mod..=8 + str_mod).contains(&roll.total));
        }
    }

    #[test]
    fn test_damage_die_roll_rejects_unknown_dice() {
        let mut weapon = ReferenceTables::bundled()
            .weapon_by_name("Club")
            .cloned()
            .unwrap();
        weapon.damage_dice = "3d4".to_string();
        let mut dice = Dice::seeded(1);
        assert_eq!(
            damage_die_roll(&weapon, &mut dice),
            Err(RulesError::UnknownDamageDice("3d4".to_string()))
        );
    }

    #[test]
    fn test_roll_with_modifier() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let mut dice = Dice::seeded(3);

        let plain = roll_with_modifier(&character, None, &mut dice);
        assert_eq!(plain.modifier, 0);
        assert!((1..=20).contains(&plain.total));

        let wis = roll_with_modifier(&character, Some(Ability::Wisdom), &mut dice);
        assert_eq!(wis.modifier, character.modifier(Ability::Wisdom));
    }

    #[test]
    fn test_strength_requirement() {
        let tables = ReferenceTables::bundled();
        let plate = tables.armor_by_name("Plate Armor").unwrap();
        let chain = tables.armor_by_name("Chain Mail Armor").unwrap();
        let leather = tables.armor_by_name("Leather Armor").unwrap();

        assert!(!meets_strength_requirement(plate, 14));
        assert!(meets_strength_requirement(plate, 15));
        assert!(!meets_strength_requirement(chain, 12));
        assert!(meets_strength_requirement(chain, 13));
        assert!(meets_strength_requirement(leather, 8));
    }
}
