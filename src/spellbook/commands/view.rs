use crate::commands::{CmdResult, SpellSelector};
use crate::error::Result;
use crate::store::SpellStore;

use super::helpers::spells_by_selectors;

pub fn run<S: SpellStore>(store: &S, selectors: &[SpellSelector]) -> Result<CmdResult> {
    let spells = spells_by_selectors(store, selectors)?;
    Ok(CmdResult::default().with_affected_spells(spells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpellId;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_loads_full_records() {
        let store = StoreFixture::new().with_samples().store;
        let result = run(
            &store,
            &[SpellSelector::Name("Fireball".into()), SpellSelector::Id(SpellId(1))],
        )
        .unwrap();
        assert_eq!(result.affected_spells.len(), 2);
        assert_eq!(result.affected_spells[0].name, "Fireball");
        assert_eq!(result.affected_spells[0].level, 3);
        assert_eq!(result.affected_spells[1].name, "Bless");
        assert_eq!(result.affected_spells[1].id, Some(SpellId(1)));
    }
}
