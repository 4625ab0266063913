use crate::commands::{create, CmdMessage, CmdResult};
use crate::error::Result;
use crate::samples::sample_spells;
use crate::store::SpellStore;

/// Add the bundled sample spells.
pub fn run<S: SpellStore>(store: &mut S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let samples = sample_spells();
    let count = samples.len();
    for spell in samples {
        result.merge(create::run(store, spell)?);
    }
    result.add_message(CmdMessage::info(format!("Seeded {} sample spells", count)));
    Ok(result)
}
