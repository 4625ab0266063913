use crate::commands::CmdResult;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::store::SpellStore;

pub fn run<S: SpellStore>(store: &S, filter: &FilterSpec) -> Result<CmdResult> {
    let entries = if filter.is_unfiltered() {
        store.list_names()?
    } else {
        store.query(filter)?
    };
    Ok(CmdResult::default().with_listed_spells(entries))
}
