use super::{sort_entries, SpellStore};
use crate::error::{Result, SpellbookError};
use crate::filter::FilterSpec;
use crate::model::{SpellEntry, SpellId, SpellRecord};
use std::collections::BTreeMap;

/// Spell storage held entirely in memory. Ids start at 1 and are never
/// reused, matching SQLite's rowid allocation for a fresh table.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    spells: BTreeMap<SpellId, SpellRecord>,
    next_id: i64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            spells: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellStore for InMemoryStore {
    fn reset(&mut self) -> Result<()> {
        *self = Self::new();
        Ok(())
    }

    fn add(&mut self, record: &SpellRecord) -> Result<SpellId> {
        record.validate()?;
        let id = SpellId(self.next_id);
        self.next_id += 1;

        let mut stored = record.clone();
        stored.id = Some(id);
        self.spells.insert(id, stored);
        Ok(id)
    }

    fn update(&mut self, id: SpellId, record: &SpellRecord) -> Result<()> {
        record.validate()?;
        let slot = self
            .spells
            .get_mut(&id)
            .ok_or(SpellbookError::NotFound(id))?;
        *slot = record.clone();
        slot.id = Some(id);
        Ok(())
    }

    fn delete(&mut self, id: SpellId) -> Result<()> {
        self.spells
            .remove(&id)
            .map(|_| ())
            .ok_or(SpellbookError::NotFound(id))
    }

    fn get(&self, id: SpellId) -> Result<SpellRecord> {
        self.spells
            .get(&id)
            .cloned()
            .ok_or(SpellbookError::NotFound(id))
    }

    fn list_names(&self) -> Result<Vec<SpellEntry>> {
        self.query(&FilterSpec::default())
    }

    fn query(&self, filter: &FilterSpec) -> Result<Vec<SpellEntry>> {
        let mut entries: Vec<SpellEntry> = self
            .spells
            .iter()
            .filter(|(_, spell)| filter.matches(spell))
            .map(|(id, spell)| SpellEntry::new(spell.name.clone(), *id))
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{School, SpellClass};
    use crate::samples;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// The bundled sample spells.
        pub fn with_samples(mut self) -> Self {
            for spell in samples::sample_spells() {
                self.store.add(&spell).unwrap();
            }
            self
        }

        pub fn with_spell(
            mut self,
            name: &str,
            level: u8,
            school: School,
            classes: &[SpellClass],
        ) -> Self {
            let mut spell = SpellRecord::new(name, level, school);
            spell.classes = classes.iter().copied().collect();
            self.store.add(&spell).unwrap();
            self
        }

        pub fn with_ritual(mut self, name: &str, level: u8, school: School) -> Self {
            let mut spell = SpellRecord::new(name, level, school);
            spell.ritual = true;
            self.store.add(&spell).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::filter::RitualFilter;
    use crate::model::{School, SpellClass};

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = InMemoryStore::new();
        let a = store.add(&SpellRecord::new("A", 1, School::Abjuration)).unwrap();
        store.delete(a).unwrap();
        let b = store.add(&SpellRecord::new("B", 1, School::Abjuration)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_ids() {
        let mut store = InMemoryStore::new();
        let record = SpellRecord::new("A", 1, School::Abjuration);
        match store.update(SpellId(7), &record) {
            Err(SpellbookError::NotFound(id)) => assert_eq!(id, SpellId(7)),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(matches!(store.delete(SpellId(7)), Err(SpellbookError::NotFound(_))));
        assert!(matches!(store.get(SpellId(7)), Err(SpellbookError::NotFound(_))));
    }

    #[test]
    fn test_add_rejects_invalid_record() {
        let mut store = InMemoryStore::new();
        let record = SpellRecord::new("  ", 1, School::Abjuration);
        assert!(matches!(store.add(&record), Err(SpellbookError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_listing_is_sorted_by_name() {
        let fixture = StoreFixture::new()
            .with_spell("Shield", 1, School::Abjuration, &[SpellClass::Wizard])
            .with_spell("Bless", 1, School::Enchantment, &[SpellClass::Cleric])
            .with_spell("Aid", 2, School::Abjuration, &[SpellClass::Cleric]);
        let names: Vec<_> = fixture
            .store
            .list_names()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Aid", "Bless", "Shield"]);
    }

    #[test]
    fn test_query_filters() {
        let fixture = StoreFixture::new()
            .with_spell("Shield", 1, School::Abjuration, &[SpellClass::Wizard])
            .with_spell("Bless", 1, School::Enchantment, &[SpellClass::Cleric])
            .with_ritual("Alarm", 1, School::Abjuration);

        let clerics = fixture
            .store
            .query(&FilterSpec::new().with_classes([SpellClass::Cleric]))
            .unwrap();
        assert_eq!(clerics.len(), 1);
        assert_eq!(clerics[0].name, "Bless");

        let rituals = fixture
            .store
            .query(&FilterSpec::new().with_ritual(RitualFilter::Required))
            .unwrap();
        assert_eq!(rituals.len(), 1);
        assert_eq!(rituals[0].name, "Alarm");

        let abjuration = fixture
            .store
            .query(&FilterSpec::new().with_school(School::Abjuration))
            .unwrap();
        assert_eq!(abjuration.len(), 2);
    }

    #[test]
    fn test_update_keeps_id() {
        let mut store = InMemoryStore::new();
        let id = store.add(&SpellRecord::new("A", 1, School::Abjuration)).unwrap();
        let mut record = store.get(id).unwrap();
        record.name = "B".to_string();
        record.id = Some(SpellId(99));
        store.update(id, &record).unwrap();
        assert_eq!(store.get(id).unwrap().id, Some(id));
        assert_eq!(store.get(id).unwrap().name, "B");
    }

    #[test]
    fn test_reset_empties_store() {
        let mut fixture = StoreFixture::new().with_samples();
        assert!(!fixture.store.is_empty());
        fixture.store.reset().unwrap();
        assert!(fixture.store.list_names().unwrap().is_empty());
    }
}
