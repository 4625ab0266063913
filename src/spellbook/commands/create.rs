use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SpellRecord;
use crate::store::SpellStore;

use super::helpers::unique_name;

/// Add a spell. A name already in use gets a numeric suffix.
pub fn run<S: SpellStore>(store: &mut S, mut record: SpellRecord) -> Result<CmdResult> {
    record.validate()?;

    let mut result = CmdResult::default();
    let name = unique_name(store, &record.name, None)?;
    if name != record.name {
        result.add_message(CmdMessage::warning(format!(
            "A spell named \"{}\" already exists, saved as \"{}\"",
            record.name, name
        )));
        record.name = name;
    }

    let id = store.add(&record)?;
    let spell = store.get(id)?;
    result.add_message(CmdMessage::success(format!(
        "Spell added ({}): {}",
        id, spell.name
    )));
    result.affected_spells.push(spell);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::SpellbookError;
    use crate::model::School;
    use crate::samples;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn test_adds_and_returns_stored_record() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, samples::bless()).unwrap();
        let spell = &result.affected_spells[0];
        assert!(spell.id.is_some());
        assert_eq!(spell.name, "Bless");
        assert_eq!(spell.description, samples::bless().description);
    }

    #[test]
    fn test_renames_on_collision() {
        let mut store = InMemoryStore::new();
        run(&mut store, samples::bless()).unwrap();
        let second = run(&mut store, samples::bless()).unwrap();
        let third = run(&mut store, samples::bless()).unwrap();

        assert_eq!(second.affected_spells[0].name, "Bless1");
        assert_eq!(third.affected_spells[0].name, "Bless2");
        assert_eq!(second.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn test_rejects_invalid_record() {
        let mut store = InMemoryStore::new();
        let record = SpellRecord::new("", 1, School::Abjuration);
        assert!(matches!(
            run(&mut store, record),
            Err(SpellbookError::Validation(_))
        ));
    }
}
