//! Character persistence.
//!
//! Each character is written to its own text file as one `Label: value`
//! line per field, and an `index.txt` in the same directory lists the file
//! of every saved character. Loading rebuilds the characters through
//! [`CharacterBuilder`], so derived values are always recomputed.

use crate::character::{AbilityScores, Character, NO_SUBCLASS};
use crate::character_builder::{BuilderError, CharacterBuilder};
use crate::reference::ReferenceTables;
use crate::registry::Registry;
use crate::sheet::CharacterSheet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Unknown class in record: {0}")]
    UnknownClass(String),

    #[error("Invalid record: {0}")]
    Invalid(#[from] BuilderError),
}

/// Name of the index file inside the save directory.
pub const INDEX_FILE: &str = "index.txt";

/// Record labels, in file order.
pub const RECORD_LABELS: [&str; 19] = [
    "Name",
    "Level",
    "Class",
    "Subclass",
    "Background",
    "Race",
    "Alignment",
    "HP",
    "Speed",
    "Proficiency Modifier",
    "Strength",
    "Dexterity",
    "Constitution",
    "Intelligence",
    "Wisdom",
    "Charisma",
    "Armor",
    "Weapon",
    "Shield",
];

/// A character record as stored, with every reference kept by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
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
    pub abilities: AbilityScores,
    pub armor: String,
    pub weapon: String,
    pub shield: bool,
}

impl CharacterRecord {
    pub fn from_character(character: &Character, tables: &ReferenceTables) -> Self {
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
            abilities: character.abilities,
            armor: character.armor_name(tables).to_string(),
            weapon: character.weapon_name(tables).to_string(),
            shield: character.has_shield,
        }
    }

    /// Render the record in file format.
    pub fn to_text(&self) -> String {
        let a = &self.abilities;
        let values = [
            self.name.clone(),
            self.level.to_string(),
            self.class.clone(),
            self.subclass.clone(),
            self.background.clone(),
            self.race.clone(),
            self.alignment.clone(),
            self.hit_points.to_string(),
            self.speed.to_string(),
            self.proficiency.to_string(),
            a.strength.to_string(),
            a.dexterity.to_string(),
            a.constitution.to_string(),
            a.intelligence.to_string(),
            a.wisdom.to_string(),
            a.charisma.to_string(),
            self.armor.clone(),
            self.weapon.clone(),
            u8::from(self.shield).to_string(),
        ];
        RECORD_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| format!("{label}: {value}\n"))
            .collect()
    }

    /// Parse a record. Labels must appear in file order.
    pub fn parse(text: &str) -> Result<Self, PersistError> {
        let mut lines = text.lines().enumerate();
        let mut values: Vec<String> = Vec::with_capacity(RECORD_LABELS.len());

        for label in RECORD_LABELS {
            let (index, line) = lines.next().ok_or_else(|| PersistError::Malformed {
                line: values.len() + 1,
                reason: format!("missing {label}"),
            })?;
            let value = line
                .strip_prefix(label)
                .and_then(|rest| rest.strip_prefix(':'))
                .ok_or_else(|| PersistError::Malformed {
                    line: index + 1,
                    reason: format!("expected {label}"),
                })?;
            values.push(value.trim().to_string());
        }

        let number = |i: usize| -> Result<i64, PersistError> {
            values[i].parse().map_err(|_| PersistError::Malformed {
                line: i + 1,
                reason: format!("{} is not a number: {:?}", RECORD_LABELS[i], values[i]),
            })
        };
        let small = |i: usize| -> Result<u8, PersistError> {
            u8::try_from(number(i)?).map_err(|_| PersistError::Malformed {
                line: i + 1,
                reason: format!("{} is out of range", RECORD_LABELS[i]),
            })
        };

        let shield = match number(18)? {
            0 => false,
            1 => true,
            _ => {
                return Err(PersistError::Malformed {
                    line: 19,
                    reason: "Shield must be 0 or 1".to_string(),
                })
            }
        };

        Ok(Self {
            name: values[0].clone(),
            level: small(1)?,
            class: values[2].clone(),
            subclass: values[3].clone(),
            background: values[4].clone(),
            race: values[5].clone(),
            alignment: values[6].clone(),
            hit_points: number(7)? as i32,
            speed: number(8)?.max(0) as u32,
            proficiency: number(9)? as i32,
            abilities: AbilityScores::new(
                small(10)?,
                small(11)?,
                small(12)?,
                small(13)?,
                small(14)?,
                small(15)?,
            ),
            armor: values[16].clone(),
            weapon: values[17].clone(),
            shield,
        })
    }

    /// Resolve the record against the tables.
    ///
    /// Armor or weapon names missing from the catalog are dropped with a
    /// warning. Stored hit points and proficiency are replaced by freshly
    /// derived values.
    pub fn into_character(self, tables: &ReferenceTables) -> Result<Character, PersistError> {
        if tables.class_id(&self.class).is_none() {
            return Err(PersistError::UnknownClass(self.class));
        }

        let mut builder = CharacterBuilder::new()
            .name(&self.name)
            .level(self.level)
            .class(&self.class)
            .background(&self.background)
            .race(&self.race)
            .alignment(&self.alignment)
            .ability_scores(self.abilities)
            .shield(self.shield);

        if self.subclass != NO_SUBCLASS && !self.subclass.is_empty() {
            builder = builder.subclass(&self.subclass);
        }
        if tables.armor_id(&self.armor).is_some() {
            builder = builder.armor(&self.armor);
        } else {
            warn!(character = %self.name, armor = %self.armor, "armor not in catalog, unequipping");
        }
        if tables.weapon_id(&self.weapon).is_some() {
            builder = builder.weapon(&self.weapon);
        } else {
            warn!(character = %self.name, weapon = %self.weapon, "weapon not in catalog, unequipping");
        }

        let character = builder.build(tables)?;
        if character.hit_points != self.hit_points || character.proficiency != self.proficiency {
            info!(
                character = %character.name,
                stored_hp = self.hit_points,
                hp = character.hit_points,
                stored_proficiency = self.proficiency,
                proficiency = character.proficiency,
                "recomputed derived stats differ from the saved record"
            );
        }
        Ok(character)
    }
}

/// File name for a character: the name with every non-alphanumeric
/// character replaced by `_`, plus `.txt`.
pub fn character_file_name(name: &str) -> String {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    format!("{sanitized}.txt")
}

/// Character files plus their index in one directory.
#[derive(Debug, Clone)]
pub struct CharacterStore {
    dir: PathBuf,
}

impl CharacterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(character_file_name(name))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Write the character's file and list it in the index.
    pub fn save(
        &self,
        character: &Character,
        tables: &ReferenceTables,
    ) -> Result<PathBuf, PersistError> {
        fs::create_dir_all(&self.dir)?;
        let file_name = character_file_name(&character.name);
        let path = self.path_for(&character.name);
        fs::write(&path, CharacterRecord::from_character(character, tables).to_text())?;

        let mut entries = self.index_entries()?;
        if !entries.contains(&file_name) {
            entries.push(file_name);
            self.write_index(&entries)?;
        }
        debug!(path = %path.display(), "character saved");
        Ok(path)
    }

    /// Delete the character's file and drop it from the index.
    pub fn remove(&self, name: &str) -> Result<(), PersistError> {
        let file_name = character_file_name(name);
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let entries = self.index_entries()?;
        if entries.contains(&file_name) {
            let kept: Vec<String> = entries.into_iter().filter(|e| *e != file_name).collect();
            self.write_index(&kept)?;
        }
        debug!(file = %file_name, "character removed");
        Ok(())
    }

    /// File names listed in the index. A missing index lists nothing.
    pub fn index_entries(&self) -> Result<Vec<String>, PersistError> {
        match fs::read_to_string(self.index_path()) {
            Ok(text) => Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_index(&self, entries: &[String]) -> Result<(), PersistError> {
        let text: String = entries.iter().map(|e| format!("{e}\n")).collect();
        fs::write(self.index_path(), text)?;
        Ok(())
    }

    /// Load every indexed character, each inserted at the front.
    ///
    /// Records that cannot be read or resolved are skipped with a warning.
    pub fn load_all(&self, tables: &ReferenceTables) -> Result<Registry, PersistError> {
        let entries = self.index_entries()?;
        if entries.is_empty() {
            info!(dir = %self.dir.display(), "no saved characters");
        }

        let mut registry = Registry::new();
        for entry in entries {
            let path = self.dir.join(&entry);
            let loaded = fs::read_to_string(&path)
                .map_err(PersistError::from)
                .and_then(|text| CharacterRecord::parse(&text))
                .and_then(|record| record.into_character(tables));
            match loaded {
                Ok(character) if registry.contains(&character.name) => {
                    warn!(file = %entry, name = %character.name, "duplicate character name, skipping");
                }
                Ok(character) => registry.insert_front(character),
                Err(e) => warn!(file = %entry, error = %e, "skipping saved character"),
            }
        }
        info!(count = registry.len(), "characters loaded");
        Ok(registry)
    }
}

/// Write the characters as a JSON array of sheets.
pub fn export_json<'a>(
    characters: impl IntoIterator<Item = &'a Character>,
    tables: &ReferenceTables,
    path: impl AsRef<Path>,
) -> Result<(), PersistError> {
    let sheets: Vec<CharacterSheet> = characters
        .into_iter()
        .map(|c| CharacterSheet::new(c, tables))
        .collect();
    let content = serde_json::to_string_pretty(&sheets)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_character;
    use tempfile::TempDir;

    #[test]
    fn test_record_text_layout() {
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let text = CharacterRecord::from_character(&character, &tables).to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 19);
        assert_eq!(lines[0], "Name: Aldric");
        assert_eq!(lines[2], "Class: Fighter");
        assert_eq!(lines[3], "Subclass: Champion");
        assert_eq!(lines[7], "HP: 52");
        assert_eq!(lines[9], "Proficiency Modifier: 3");
        assert_eq!(lines[16], "Armor: Plate Armor");
        assert_eq!(lines[18], "Shield: 0");
    }

    #[test]
    fn test_parse_rejects_out_of_order_labels() {
        let tables = ReferenceTables::bundled();
        let text = CharacterRecord::from_character(&sample_character(&tables), &tables)
            .to_text()
            .replace("Level: 5\nClass: Fighter", "Class: Fighter\nLevel: 5");
        assert!(matches!(
            CharacterRecord::parse(&text),
            Err(PersistError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_record() {
        assert!(matches!(
            CharacterRecord::parse("Name: Aldric\nLevel: 5\n"),
            Err(PersistError::Malformed { .. })
        ));
        assert!(matches!(
            CharacterRecord::parse("Name: Aldric\nLevel: five\n"),
            Err(PersistError::Malformed { .. })
        ));
    }

    #[test]
    fn test_record_without_trailing_newline() {
        let tables = ReferenceTables::bundled();
        let text = CharacterRecord::from_character(&sample_character(&tables), &tables).to_text();
        let record = CharacterRecord::parse(text.trim_end()).unwrap();
        assert!(!record.shield);
    }

    #[test]
    fn test_derived_values_recomputed_on_load() {
        let tables = ReferenceTables::bundled();
        let text = CharacterRecord::from_character(&sample_character(&tables), &tables)
            .to_text()
            .replace("HP: 52", "HP: 999")
            .replace("Proficiency Modifier: 3", "Proficiency Modifier: 9");
        let character = CharacterRecord::parse(&text)
            .unwrap()
            .into_character(&tables)
            .unwrap();
        assert_eq!(character.hit_points, 52);
        assert_eq!(character.proficiency, 3);
    }

    #[test]
    fn test_unknown_items_are_unequipped() {
        let tables = ReferenceTables::bundled();
        let text = CharacterRecord::from_character(&sample_character(&tables), &tables)
            .to_text()
            .replace("Armor: Plate Armor", "Armor: Mithral Plate")
            .replace("Weapon: Longsword", "Weapon: N/A");
        let character = CharacterRecord::parse(&text)
            .unwrap()
            .into_character(&tables)
            .unwrap();
        assert_eq!(character.armor, None);
        assert_eq!(character.weapon, None);
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let tables = ReferenceTables::bundled();
        let text = CharacterRecord::from_character(&sample_character(&tables), &tables)
            .to_text()
            .replace("Class: Fighter", "Class: Artificer");
        assert!(matches!(
            CharacterRecord::parse(&text).unwrap().into_character(&tables),
            Err(PersistError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(character_file_name("Aldric"), "Aldric.txt");
        assert_eq!(character_file_name("Mary Sue"), "Mary_Sue.txt");
        assert_eq!(character_file_name("O'Brien"), "O_Brien.txt");
    }

    #[test]
    fn test_save_and_remove() {
        let dir = TempDir::new().unwrap();
        let tables = ReferenceTables::bundled();
        let store = CharacterStore::new(dir.path());
        let character = sample_character(&tables);

        let path = store.save(&character, &tables).unwrap();
        assert!(path.exists());
        assert_eq!(path, store.path_for("Aldric"));
        assert_eq!(store.path_for("Mary Sue"), dir.path().join("Mary_Sue.txt"));
        store.save(&character, &tables).unwrap();
        assert_eq!(store.index_entries().unwrap(), vec!["Aldric.txt".to_string()]);

        store.remove("Aldric").unwrap();
        assert!(!path.exists());
        assert!(store.index_entries().unwrap().is_empty());

        // Removing again is harmless.
        store.remove("Aldric").unwrap();
    }

    #[test]
    fn test_missing_index_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = CharacterStore::new(dir.path().join("nowhere"));
        let registry = store.load_all(&ReferenceTables::bundled()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_skips_bad_entries() {
        let dir = TempDir::new().unwrap();
        let tables = ReferenceTables::bundled();
        let store = CharacterStore::new(dir.path());
        store.save(&sample_character(&tables), &tables).unwrap();

        fs::write(dir.path().join("Broken.txt"), "Name: Broken\n").unwrap();
        fs::write(
            dir.path().join(INDEX_FILE),
            "Aldric.txt\nBroken.txt\nMissing.txt\n",
        )
        .unwrap();

        let registry = store.load_all(&tables).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Aldric"));
    }

    #[test]
    fn test_export_json() {
        let dir = TempDir::new().unwrap();
        let tables = ReferenceTables::bundled();
        let character = sample_character(&tables);
        let path = dir.path().join("roster.json");

        export_json([&character], &tables, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["name"], "Aldric");
        assert_eq!(value[0]["hit_points"], 52);
    }
}
