use crate::commands::{seed, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::SpellStore;

/// Wipe the store and recreate it, optionally seeding samples.
pub fn run<S: SpellStore>(store: &mut S, with_samples: bool) -> Result<CmdResult> {
    store.reset()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Initialized spellbook"));
    if with_samples {
        result.merge(seed::run(store)?);
    }
    Ok(result)
}
