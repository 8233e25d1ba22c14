//! In-memory character registry.
//!
//! Characters are kept newest first. Lookups are linear and return the first
//! exact name match.

use crate::character::Character;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    characters: VecDeque<Character>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_front(&mut self, character: Character) {
        self.characters.push_front(character);
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }

    /// Remove the first character with this name.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Character> {
        let index = self.characters.iter().position(|c| c.name == name)?;
        self.characters.remove(index)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Character> + '_ {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceTables;
    use crate::testing::sample_character;

    fn named(tables: &ReferenceTables, name: &str) -> Character {
        let mut character = sample_character(tables);
        character.name = name.to_string();
        character
    }

    #[test]
    fn test_insert_front_order() {
        let tables = ReferenceTables::bundled();
        let mut registry = Registry::new();
        registry.insert_front(named(&tables, "A"));
        registry.insert_front(named(&tables, "B"));
        registry.insert_front(named(&tables, "C"));

        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        // Traversal is restartable.
        assert_eq!(registry.iter().count(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_find_and_remove() {
        let tables = ReferenceTables::bundled();
        let mut registry = Registry::new();
        registry.insert_front(named(&tables, "A"));
        registry.insert_front(named(&tables, "B"));

        assert!(registry.contains("A"));
        assert!(!registry.contains("a"));
        assert_eq!(registry.find_by_name("B").unwrap().name, "B");

        let removed = registry.remove_by_name("A").unwrap();
        assert_eq!(removed.name, "A");
        assert!(!registry.contains("A"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let tables = ReferenceTables::bundled();
        let mut registry = Registry::new();
        registry.insert_front(named(&tables, "A"));
        let before = registry.clone();

        assert!(registry.remove_by_name("Nobody").is_none());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_update_in_place() {
        let tables = ReferenceTables::bundled();
        let mut registry = Registry::new();
        registry.insert_front(named(&tables, "A"));
        registry.insert_front(named(&tables, "B"));

        registry.find_by_name_mut("A").unwrap().has_shield = true;
        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(registry.find_by_name("A").unwrap().has_shield);
    }

    #[test]
    fn test_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.find_by_name("A").is_none());
        assert_eq!(registry.iter().next(), None);
    }
}
