use crate::commands::{CmdMessage, CmdResult, SpellSelector};
use crate::error::Result;
use crate::store::SpellStore;

use super::helpers::resolve_selectors;

pub fn run<S: SpellStore>(store: &mut S, selectors: &[SpellSelector]) -> Result<CmdResult> {
    let ids = resolve_selectors(store, selectors)?;
    let mut result = CmdResult::default();

    for id in ids {
        let spell = store.get(id)?;
        store.delete(id)?;
        result.add_message(CmdMessage::success(format!(
            "Spell deleted ({}): {}",
            id, spell.name
        )));
        result.affected_spells.push(spell);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::list;
    use crate::error::SpellbookError;
    use crate::filter::FilterSpec;
    use crate::model::SpellId;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_removes_spell_from_listings() {
        let mut store = StoreFixture::new().with_samples().store;
        run(&mut store, &[SpellSelector::Name("Bless".into())]).unwrap();

        let listed = list::run(&store, &FilterSpec::new()).unwrap().listed_spells;
        assert!(listed.iter().all(|e| e.name != "Bless"));
        assert!(matches!(
            store.get(SpellId(1)),
            Err(SpellbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_nothing_is_deleted_when_a_selector_fails() {
        let mut store = StoreFixture::new().with_samples().store;
        let result = run(
            &mut store,
            &[SpellSelector::Id(SpellId(1)), SpellSelector::Name("Wish".into())],
        );
        assert!(result.is_err());
        assert!(store.get(SpellId(1)).is_ok());
    }
}
