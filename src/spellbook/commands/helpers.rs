use crate::commands::SpellSelector;
use crate::error::{Result, SpellbookError};
use crate::model::{SpellId, SpellRecord};
use crate::store::SpellStore;
use std::collections::HashSet;

/// Resolve selectors to ids, in order. Names must match exactly one spell.
pub fn resolve_selectors<S: SpellStore>(
    store: &S,
    selectors: &[SpellSelector],
) -> Result<Vec<SpellId>> {
    let mut entries = None;
    selectors
        .iter()
        .map(|selector| match selector {
            SpellSelector::Id(id) => {
                store.get(*id)?;
                Ok(*id)
            }
            SpellSelector::Name(name) => {
                if entries.is_none() {
                    entries = Some(store.list_names()?);
                }
                let matches: Vec<SpellId> = entries
                    .iter()
                    .flatten()
                    .filter(|entry| entry.name == *name)
                    .map(|entry| entry.id)
                    .collect();
                match matches.as_slice() {
                    [] => Err(SpellbookError::Api(format!("No spell named \"{}\"", name))),
                    [id] => Ok(*id),
                    ids => Err(SpellbookError::Api(format!(
                        "\"{}\" matches {} spells, select one by id",
                        name,
                        ids.len()
                    ))),
                }
            }
        })
        .collect()
}

pub fn spells_by_selectors<S: SpellStore>(
    store: &S,
    selectors: &[SpellSelector],
) -> Result<Vec<SpellRecord>> {
    resolve_selectors(store, selectors)?
        .into_iter()
        .map(|id| store.get(id))
        .collect()
}

/// `name` if no other spell uses it, otherwise the first free `name1`,
/// `name2`, ... The spell `except` is ignored, so renaming a spell to its
/// own name keeps it.
pub fn unique_name<S: SpellStore>(store: &S, name: &str, except: Option<SpellId>) -> Result<String> {
    let taken: HashSet<String> = store
        .list_names()?
        .into_iter()
        .filter(|entry| Some(entry.id) != except)
        .map(|entry| entry.name)
        .collect();

    if !taken.contains(name) {
        return Ok(name.to_string());
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{}{}", name, n);
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::School;
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_spell("Bless", 1, School::Enchantment, &[])
            .with_spell("Bless1", 1, School::Enchantment, &[])
            .with_spell("Shield", 1, School::Abjuration, &[])
    }

    #[test]
    fn test_unique_name_appends_first_free_number() {
        let store = fixture().store;
        assert_eq!(unique_name(&store, "Aid", None).unwrap(), "Aid");
        assert_eq!(unique_name(&store, "Shield", None).unwrap(), "Shield1");
        assert_eq!(unique_name(&store, "Bless", None).unwrap(), "Bless2");
    }

    #[test]
    fn test_unique_name_ignores_the_spell_itself() {
        let store = fixture().store;
        let shield = resolve_selectors(&store, &[SpellSelector::Name("Shield".into())]).unwrap();
        assert_eq!(unique_name(&store, "Shield", Some(shield[0])).unwrap(), "Shield");
    }

    #[test]
    fn test_resolves_ids_and_names() {
        let store = fixture().store;
        let ids = resolve_selectors(
            &store,
            &[SpellSelector::Name("Shield".into()), SpellSelector::Id(SpellId(1))],
        )
        .unwrap();
        assert_eq!(ids, vec![SpellId(3), SpellId(1)]);
    }

    #[test]
    fn test_unknown_selectors_fail() {
        let store = fixture().store;
        assert!(matches!(
            resolve_selectors(&store, &[SpellSelector::Name("Wish".into())]),
            Err(SpellbookError::Api(_))
        ));
        assert!(matches!(
            resolve_selectors(&store, &[SpellSelector::Id(SpellId(42))]),
            Err(SpellbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_names_are_ambiguous() {
        let store = StoreFixture::new()
            .with_spell("Bless", 1, School::Enchantment, &[])
            .with_spell("Bless", 1, School::Enchantment, &[])
            .store;
        assert!(matches!(
            resolve_selectors(&store, &[SpellSelector::Name("Bless".into())]),
            Err(SpellbookError::Api(_))
        ));
    }
}
