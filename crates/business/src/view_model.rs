//! In-memory person list
//!
//! Mirrors the store's `Person` table for the presentation layer. The list is
//! loaded wholesale once, then patched after each successful store write.
//! Every entry carries an `EntryId` so the list can address one person even
//! when several share the same name and surname.
//!
//! The filtered view is recomputed in full on every filter change and after
//! every mutation: O(n) per keystroke.

use crate::error::{BusinessError, BusinessResult};
use agenda_core::{Person, PersonKey};
use std::fmt;

/// Identity of one entry in the list; never reused within a list's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: EntryId,
    person: Person,
}

/// Ordered person list plus its filtered view
#[derive(Debug, Default)]
pub struct PersonList {
    entries: Vec<Entry>,
    next_id: u32,
    filter: String,
    /// Indices into `entries` that pass the filter, in order
    visible: Vec<usize>,
    revision: u64,
}

impl PersonList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence; previous ids become stale
    pub fn load(&mut self, persons: Vec<Person>) {
        let entries: Vec<Entry> = persons
            .into_iter()
            .map(|person| Entry {
                id: self.allocate_id(),
                person,
            })
            .collect();
        self.entries = entries;
        self.recompute();
    }

    /// Append `person` unless a structurally-equal one is already present.
    ///
    /// Persons sharing name and surname but differing in age are both kept.
    pub fn add(&mut self, person: Person) -> Option<EntryId> {
        if self.contains(&person) {
            return None;
        }
        let id = self.allocate_id();
        self.entries.push(Entry { id, person });
        self.recompute();
        Some(id)
    }

    /// Remove the first structurally-equal person
    pub fn remove(&mut self, person: &Person) -> Option<Person> {
        let index = self.entries.iter().position(|e| &e.person == person)?;
        Some(self.remove_at(index))
    }

    /// Remove the entry with this identity
    pub fn remove_entry(&mut self, id: EntryId) -> Option<Person> {
        let index = self.index_of(id)?;
        Some(self.remove_at(index))
    }

    /// Overwrite the fields of the entry `id` in place, keeping its position
    pub fn update_in_place(&mut self, id: EntryId, values: &Person) -> BusinessResult<()> {
        let index = self.index_of(id).ok_or(BusinessError::StaleSelection(id))?;
        self.entries[index].person.assign(values);
        self.recompute();
        Ok(())
    }

    /// Persons whose name contains `text`, case-insensitive, in list order.
    /// Empty text yields the whole list.
    pub fn filter(&self, text: &str) -> Vec<&Person> {
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(|e| matches_name(&e.person, &needle))
            .map(|e| &e.person)
            .collect()
    }

    /// Change the filter text and recompute the visible view
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
        self.recompute();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    /// Re-apply the filter and bump the render revision without touching data
    pub fn refresh(&mut self) {
        self.recompute();
    }

    /// Entries passing the current filter
    pub fn visible(&self) -> impl Iterator<Item = (EntryId, &Person)> + '_ {
        self.visible.iter().map(move |&i| {
            let entry = &self.entries[i];
            (entry.id, &entry.person)
        })
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Incremented every time the view needs re-rendering
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: EntryId) -> Option<&Person> {
        self.index_of(id).map(|i| &self.entries[i].person)
    }

    /// First entry addressed by `key`
    pub fn find_by_key(&self, key: &PersonKey) -> Option<EntryId> {
        self.entries
            .iter()
            .find(|e| e.person.has_key(key))
            .map(|e| e.id)
    }

    pub fn contains(&self, person: &Person) -> bool {
        self.entries.iter().any(|e| &e.person == person)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Person)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.person))
    }

    pub fn persons(&self) -> Vec<Person> {
        self.entries.iter().map(|e| e.person.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn remove_at(&mut self, index: usize) -> Person {
        let entry = self.entries.remove(index);
        self.recompute();
        entry.person
    }

    fn recompute(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches_name(&e.person, &needle))
            .map(|(i, _)| i)
            .collect();
        self.revision += 1;
    }
}

fn matches_name(person: &Person, needle: &str) -> bool {
    needle.is_empty() || person.name().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, surname: &str, age: i32) -> Person {
        Person::new(name, surname, age).unwrap()
    }

    fn sample() -> PersonList {
        let mut list = PersonList::new();
        list.load(vec![
            person("Ana", "Gomez", 30),
            person("Luis", "Perez", 41),
            person("Mariana", "Lopez", 25),
        ]);
        list
    }

    #[test]
    fn test_load_replaces_everything() {
        let mut list = sample();
        let old_id = list.iter().next().unwrap().0;

        list.load(vec![person("Eva", "Santos", 60)]);
        assert_eq!(list.len(), 1);
        assert!(list.get(old_id).is_none());
        assert_eq!(list.visible_len(), 1);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut list = sample();
        let before = list.persons();

        let id = list.add(person("Ana", "Gomez", 31)).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(id), Some(&person("Ana", "Gomez", 31)));

        assert_eq!(list.remove(&person("Ana", "Gomez", 31)), Some(person("Ana", "Gomez", 31)));
        assert_eq!(list.persons(), before);
    }

    #[test]
    fn test_add_rejects_structural_duplicate() {
        let mut list = sample();
        assert!(list.add(person("Ana", "Gomez", 30)).is_none());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut list = sample();
        assert!(list.remove(&person("Ana", "Gomez", 99)).is_none());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let mut list = sample();
        let (id, _) = list.iter().nth(1).unwrap();

        list.update_in_place(id, &person("Luis", "Perez", 42)).unwrap();
        assert_eq!(list.persons()[1], person("Luis", "Perez", 42));
        assert_eq!(list.get(id).unwrap().age(), 42);
    }

    #[test]
    fn test_update_in_place_targets_identity_not_value() {
        let mut list = PersonList::new();
        let first = list.add(person("Ana", "Gomez", 30)).unwrap();
        let second = list.add(person("Ana", "Gomez", 52)).unwrap();

        list.update_in_place(second, &person("Ana", "Gomez", 53)).unwrap();
        assert_eq!(list.get(first).unwrap().age(), 30);
        assert_eq!(list.get(second).unwrap().age(), 53);
    }

    #[test]
    fn test_update_stale_entry() {
        let mut list = sample();
        let (id, _) = list.iter().next().unwrap();
        list.remove_entry(id).unwrap();

        let err = list.update_in_place(id, &person("X", "Y", 1)).unwrap_err();
        assert!(matches!(err, BusinessError::StaleSelection(stale) if stale == id));
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let list = sample();
        let all: Vec<Person> = list.filter("").into_iter().cloned().collect();
        assert_eq!(all, list.persons());
    }

    #[test]
    fn test_filter_case_insensitive_preserves_order() {
        let list = sample();
        let names: Vec<&str> = list.filter("AN").iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Ana", "Mariana"]);

        // Only the name is matched, never the surname.
        assert!(list.filter("gomez").is_empty());
    }

    #[test]
    fn test_visible_follows_filter_and_mutations() {
        let mut list = sample();
        list.set_filter("an");
        assert_eq!(list.visible_len(), 2);

        list.add(person("Anton", "Ruiz", 19));
        assert_eq!(list.visible_len(), 3);

        list.set_filter("");
        assert_eq!(list.visible_len(), 4);
    }

    #[test]
    fn test_same_key_different_age_both_kept_and_filtered() {
        let mut list = PersonList::new();
        list.add(person("Ana", "Gomez", 30)).unwrap();
        list.add(person("Ana", "Gomez", 52)).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.filter("ana").len(), 2);
        assert_eq!(
            list.find_by_key(&PersonKey::new("Ana", "Gomez")),
            list.iter().next().map(|(id, _)| id)
        );
    }

    #[test]
    fn test_refresh_bumps_revision() {
        let mut list = sample();
        let before = list.revision();
        list.refresh();
        assert!(list.revision() > before);
    }
}
