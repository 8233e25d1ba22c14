//! Armor and weapon catalog entries.
//!
//! Both catalogs are read from comma-separated rows, one item per line. The
//! rows follow the column order of `armors.txt` and `weapons.txt`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error from parsing a catalog row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Index of an armor in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArmorId(pub usize);

/// Index of a weapon in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub usize);

// ============================================================================
// Armor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
}

impl ArmorCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorCategory::Light => "Light",
            ArmorCategory::Medium => "Medium",
            ArmorCategory::Heavy => "Heavy",
        }
    }
}

impl FromStr for ArmorCategory {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ArmorCategory::Light),
            "medium" => Ok(ArmorCategory::Medium),
            "heavy" => Ok(ArmorCategory::Heavy),
            _ => Err(ItemParseError::InvalidField {
                field: "armor type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArmorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Armor with D&D 5e properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorItem {
    pub name: String,
    pub category: ArmorCategory,
    pub base_ac: i32,
    /// `None` means the dexterity bonus is uncapped.
    pub max_dex_bonus: Option<i32>,
    pub requires_dex_cap: bool,
    pub stealth_disadvantage: bool,
    pub strength_requirement: Option<u8>,
}

/// Strength needed to wear an armor, keyed on its catalog name.
pub fn strength_requirement_for(name: &str) -> Option<u8> {
    match name {
        "Chain Mail Armor" => Some(13),
        "Splint Armor" | "Plate Armor" => Some(15),
        _ => None,
    }
}

impl ArmorItem {
    pub fn new(name: impl Into<String>, category: ArmorCategory, base_ac: i32) -> Self {
        let name = name.into();
        let strength_requirement = strength_requirement_for(&name);
        Self {
            name,
            category,
            base_ac,
            max_dex_bonus: None,
            requires_dex_cap: false,
            stealth_disadvantage: false,
            strength_requirement,
        }
    }

    pub fn with_dex_cap(mut self, cap: i32) -> Self {
        self.max_dex_bonus = Some(cap);
        self.requires_dex_cap = true;
        self
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        self.stealth_disadvantage = true;
        self
    }

    pub fn requirement_label(&self) -> String {
        match self.strength_requirement {
            Some(strength) => format!("{strength} Strength"),
            None => "-".to_string(),
        }
    }

    pub fn stealth_label(&self) -> &'static str {
        if self.stealth_disadvantage {
            "Disadvantage"
        } else {
            "-"
        }
    }

    pub fn dex_cap_label(&self) -> String {
        match (self.category, self.max_dex_bonus) {
            (ArmorCategory::Heavy, _) => "0".to_string(),
            (_, Some(cap)) if self.requires_dex_cap => format!("max {cap}"),
            _ => "full".to_string(),
        }
    }
}

impl FromStr for ArmorItem {
    type Err = ItemParseError;

    /// `name,type,baseAC,maxDexBonus,stealthDisadvantage,requiresDexCap`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(line, 6)?;
        let max_dex: i32 = parse_number(fields[3], "max dex bonus")?;

        Ok(ArmorItem {
            name: fields[0].to_string(),
            category: fields[1].parse()?,
            base_ac: parse_number(fields[2], "base AC")?,
            max_dex_bonus: (max_dex >= 0).then_some(max_dex),
            stealth_disadvantage: parse_flag(fields[4], "stealth disadvantage")?,
            requires_dex_cap: parse_flag(fields[5], "requires dex cap")?,
            strength_requirement: strength_requirement_for(fields[0]),
        })
    }
}

// ============================================================================
// Weapons
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponCategory {
    Melee,
    Ranged,
    MeleeRanged,
}

impl WeaponCategory {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponCategory::Melee => "Melee",
            WeaponCategory::Ranged => "Ranged",
            WeaponCategory::MeleeRanged => "Melee/Ranged",
        }
    }
}

impl FromStr for WeaponCategory {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "melee" => Ok(WeaponCategory::Melee),
            "ranged" => Ok(WeaponCategory::Ranged),
            "melee/ranged" | "melee-ranged" => Ok(WeaponCategory::MeleeRanged),
            _ => Err(ItemParseError::InvalidField {
                field: "weapon type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Weapon damage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponDamageType {
    Slashing,
    Piercing,
    Bludgeoning,
}

impl WeaponDamageType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponDamageType::Slashing => "Slashing",
            WeaponDamageType::Piercing => "Piercing",
            WeaponDamageType::Bludgeoning => "Bludgeoning",
        }
    }
}

impl FromStr for WeaponDamageType {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slashing" => Ok(WeaponDamageType::Slashing),
            "piercing" => Ok(WeaponDamageType::Piercing),
            "bludgeoning" => Ok(WeaponDamageType::Bludgeoning),
            _ => Err(ItemParseError::InvalidField {
                field: "damage type",
                value: s.to_string(),
            }),
        }
    }
}

/// Weapon properties per D&D 5e.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponProperty {
    Finesse,
    Light,
    Heavy,
    TwoHanded,
    /// Versatile, with the two-handed damage dice when the catalog has them.
    Versatile(Option<String>),
    Reach,
}

/// Weapons with D&D 5e properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponItem {
    pub name: String,
    pub category: WeaponCategory,
    pub damage_type: WeaponDamageType,
    /// One-handed damage dice label, e.g. `1d8`.
    pub damage_dice: String,
    pub two_handed_damage: Option<String>,
    pub properties: Vec<WeaponProperty>,
    /// Normal and long range; `None` for melee-only weapons.
    pub range: Option<(u32, u32)>,
}

impl WeaponItem {
    pub fn new(
        name: impl Into<String>,
        category: WeaponCategory,
        damage_dice: impl Into<String>,
        damage_type: WeaponDamageType,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            damage_type,
            damage_dice: damage_dice.into(),
            two_handed_damage: None,
            properties: Vec::new(),
            range: None,
        }
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_range(mut self, normal: u32, long: u32) -> Self {
        self.range = Some((normal, long));
        self
    }

    pub fn is_finesse(&self) -> bool {
        self.properties.contains(&WeaponProperty::Finesse)
    }

    pub fn is_ranged(&self) -> bool {
        self.category == WeaponCategory::Ranged
    }

    pub fn is_versatile(&self) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(p, WeaponProperty::Versatile(_)))
    }

    pub fn is_two_handed(&self) -> bool {
        self.properties.contains(&WeaponProperty::TwoHanded)
    }

    pub fn is_light(&self) -> bool {
        self.properties.contains(&WeaponProperty::Light)
    }

    pub fn is_heavy(&self) -> bool {
        self.properties.contains(&WeaponProperty::Heavy)
    }

    pub fn has_reach(&self) -> bool {
        self.properties.contains(&WeaponProperty::Reach)
    }

    pub fn finesse_label(&self) -> &'static str {
        if self.is_finesse() {
            "Finesse"
        } else {
            "-"
        }
    }

    pub fn versatile_label(&self) -> &'static str {
        if self.is_versatile() {
            "Versatile"
        } else {
            "-"
        }
    }

    pub fn range_label(&self) -> String {
        match self.range {
            Some((normal, long)) => format!("{normal}/{long}"),
            None => "Melee".to_string(),
        }
    }
}

impl FromStr for WeaponItem {
    type Err = ItemParseError;

    /// `name,type,damageType,damageDice,twoHandDamage,finesse,versatile,
    /// twoHanded,rangeMin,rangeMax,light,heavy,reach`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(line, 13)?;

        let two_handed_damage = match fields[4] {
            "" | "-" | "N/A" | "None" | "none" => None,
            dice => Some(dice.to_string()),
        };

        let mut properties = Vec::new();
        if parse_flag(fields[5], "finesse")? {
            properties.push(WeaponProperty::Finesse);
        }
        if parse_flag(fields[6], "versatile")? {
            properties.push(WeaponProperty::Versatile(two_handed_damage.clone()));
        }
        if parse_flag(fields[7], "two-handed")? {
            properties.push(WeaponProperty::TwoHanded);
        }
        if parse_flag(fields[10], "light")? {
            properties.push(WeaponProperty::Light);
        }
        if parse_flag(fields[11], "heavy")? {
            properties.push(WeaponProperty::Heavy);
        }
        if parse_flag(fields[12], "reach")? {
            properties.push(WeaponProperty::Reach);
        }

        let normal: u32 = parse_number(fields[8], "minimum range")?;
        let long: u32 = parse_number(fields[9], "maximum range")?;

        Ok(WeaponItem {
            name: fields[0].to_string(),
            category: fields[1].parse()?,
            damage_type: fields[2].parse()?,
            damage_dice: fields[3].to_string(),
            two_handed_damage,
            properties,
            range: (normal != 0 || long != 0).then_some((normal, long)),
        })
    }
}

// ============================================================================
// Row helpers
// ============================================================================

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, ItemParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(ItemParseError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number<T: FromStr>(value: &str, field: &'static str) -> Result<T, ItemParseError> {
    value.parse().map_err(|_| ItemParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_flag(value: &str, field: &'static str) -> Result<bool, ItemParseError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ItemParseError::InvalidField {
            field,
            value: value.to_string(),
        }),
    }
}
