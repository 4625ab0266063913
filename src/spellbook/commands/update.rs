use crate::commands::{CmdMessage, CmdResult, SpellSelector};
use crate::error::{Result, SpellbookError};
use crate::model::SpellRecord;
use crate::store::SpellStore;

use super::helpers::{resolve_selectors, unique_name};

/// Replace the selected spell with `record`, keeping its id.
pub fn run<S: SpellStore>(
    store: &mut S,
    selectors: &[SpellSelector],
    mut record: SpellRecord,
) -> Result<CmdResult> {
    let id = match resolve_selectors(store, selectors)?.as_slice() {
        [id] => *id,
        ids => {
            return Err(SpellbookError::Api(format!(
                "Update needs exactly one spell, got {}",
                ids.len()
            )))
        }
    };
    record.validate()?;

    let mut result = CmdResult::default();
    let name = unique_name(store, &record.name, Some(id))?;
    if name != record.name {
        result.add_message(CmdMessage::warning(format!(
            "A spell named \"{}\" already exists, saved as \"{}\"",
            record.name, name
        )));
        record.name = name;
    }

    store.update(id, &record)?;
    let spell = store.get(id)?;
    result.add_message(CmdMessage::success(format!(
        "Spell updated ({}): {}",
        id, spell.name
    )));
    result.affected_spells.push(spell);
    Ok(result)
}
