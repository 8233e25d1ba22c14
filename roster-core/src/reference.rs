//! Read-only reference tables.
//!
//! The tables are loaded once at startup, either from a data directory or
//! from the copies bundled into the crate, and are shared by reference for
//! the rest of the session.

use crate::class_data::{ClassEntry, ClassId};
use crate::items::{ArmorId, ArmorItem, WeaponId, WeaponItem};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading reference files.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file} line {line}: {reason}")]
    Malformed {
        file: &'static str,
        line: usize,
        reason: String,
    },
}

/// A reference file together with its bundled copy and expected row count.
#[derive(Debug, Clone, Copy)]
pub struct TableFile {
    pub name: &'static str,
    pub bundled: &'static str,
    pub expected_rows: usize,
}

pub const ARMORS: TableFile = TableFile {
    name: "armors.txt",
    bundled: include_str!("../data/armors.txt"),
    expected_rows: 13,
};

pub const WEAPONS: TableFile = TableFile {
    name: "weapons.txt",
    bundled: include_str!("../data/weapons.txt"),
    expected_rows: 31,
};

pub const CLASSES: TableFile = TableFile {
    name: "classes.txt",
    bundled: include_str!("../data/classes.txt"),
    expected_rows: 12,
};

pub const ATTRIBUTES: TableFile = TableFile {
    name: "attributes.txt",
    bundled: include_str!("../data/attributes.txt"),
    expected_rows: 6,
};

pub const ALIGNMENTS: TableFile = TableFile {
    name: "alignments.txt",
    bundled: include_str!("../data/alignments.txt"),
    expected_rows: 9,
};

pub const RACES: TableFile = TableFile {
    name: "races.txt",
    bundled: include_str!("../data/races.txt"),
    expected_rows: 10,
};

pub const BACKGROUNDS: TableFile = TableFile {
    name: "backgrounds.txt",
    bundled: include_str!("../data/backgrounds.txt"),
    expected_rows: 16,
};

/// Every lookup table the roster needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    pub armors: Vec<ArmorItem>,
    pub weapons: Vec<WeaponItem>,
    pub classes: Vec<ClassEntry>,
    pub attributes: Vec<String>,
    pub alignments: Vec<String>,
    pub races: Vec<String>,
    pub backgrounds: Vec<String>,
}

impl ReferenceTables {
    /// The data set compiled into the crate.
    pub fn bundled() -> Self {
        Self::from_sources(|table| table.bundled.to_string())
    }

    /// Load every table from `dir`.
    ///
    /// A file that cannot be read is replaced by its bundled copy. Malformed
    /// lines are skipped, and short tables are kept as loaded.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::from_sources(|table| match read_table(dir, table) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "falling back to bundled {}", table.name);
                table.bundled.to_string()
            }
        })
    }

    fn from_sources(mut source: impl FnMut(&TableFile) -> String) -> Self {
        let tables = Self {
            armors: parse_rows(&ARMORS, &source(&ARMORS), |row| {
                row.parse::<ArmorItem>().map_err(|e| e.to_string())
            }),
            weapons: parse_rows(&WEAPONS, &source(&WEAPONS), |row| {
                row.parse::<WeaponItem>().map_err(|e| e.to_string())
            }),
            classes: parse_rows(&CLASSES, &source(&CLASSES), |row| {
                ClassEntry::parse_row(row)
                    .ok_or_else(|| "expected a class and four subclasses".to_string())
            }),
            attributes: parse_list(&ATTRIBUTES, &source(&ATTRIBUTES)),
            alignments: parse_list(&ALIGNMENTS, &source(&ALIGNMENTS)),
            races: parse_list(&RACES, &source(&RACES)),
            backgrounds: parse_list(&BACKGROUNDS, &source(&BACKGROUNDS)),
        };
        debug!(
            armors = tables.armors.len(),
            weapons = tables.weapons.len(),
            classes = tables.classes.len(),
            "reference tables loaded"
        );
        tables
    }

    pub fn armor(&self, id: ArmorId) -> Option<&ArmorItem> {
        self.armors.get(id.0)
    }

    pub fn weapon(&self, id: WeaponId) -> Option<&WeaponItem> {
        self.weapons.get(id.0)
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassEntry> {
        self.classes.get(id.0)
    }

    pub fn armor_id(&self, name: &str) -> Option<ArmorId> {
        self.armors.iter().position(|a| a.name == name).map(ArmorId)
    }

    pub fn weapon_id(&self, name: &str) -> Option<WeaponId> {
        self.weapons.iter().position(|w| w.name == name).map(WeaponId)
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.iter().position(|c| c.name == name).map(ClassId)
    }

    pub fn armor_by_name(&self, name: &str) -> Option<&ArmorItem> {
        self.armor_id(name).and_then(|id| self.armor(id))
    }

    pub fn weapon_by_name(&self, name: &str) -> Option<&WeaponItem> {
        self.weapon_id(name).and_then(|id| self.weapon(id))
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::bundled()
    }
}

fn read_table(dir: &Path, table: &TableFile) -> Result<String, ReferenceError> {
    let path = dir.join(table.name);
    fs::read_to_string(&path).map_err(|source| ReferenceError::Io { path, source })
}

fn parse_rows<T>(
    table: &TableFile,
    text: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Vec<T> {
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse(line) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                let e = ReferenceError::Malformed {
                    file: table.name,
                    line: index + 1,
                    reason,
                };
                warn!(error = %e, "skipping reference row");
            }
        }
    }
    check_count(table, rows.len());
    rows
}

fn parse_list(table: &TableFile, text: &str) -> Vec<String> {
    parse_rows(table, text, |line| Ok(line.to_string()))
}

fn check_count(table: &TableFile, found: usize) {
    if found != table.expected_rows {
        warn!(
            file = table.name,
            expected = table.expected_rows,
            found,
            "reference table has an unexpected number of rows"
        );
    }
}
