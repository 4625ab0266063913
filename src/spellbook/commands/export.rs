use crate::commands::{CmdMessage, CmdResult, SpellSelector};
use crate::error::Result;
use crate::model::SpellRecord;
use crate::store::SpellStore;
use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::helpers::spells_by_selectors;

/// Write the selected spells (all when none are selected) to a JSON file in
/// `out_dir`.
pub fn run<S: SpellStore>(
    store: &S,
    selectors: &[SpellSelector],
    out_dir: &Path,
) -> Result<CmdResult> {
    let spells = resolve_spells(store, selectors)?;

    if spells.is_empty() {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("No spells to export."));
        return Ok(res);
    }

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(export_filename());
    write_export(&path, &spells)?;
    info!("Exported {} spells to {}", spells.len(), path.display());

    let mut result = CmdResult::default().with_export_path(path.clone());
    result.add_message(CmdMessage::success(format!(
        "Exported {} spells to {}",
        spells.len(),
        path.display()
    )));
    Ok(result.with_affected_spells(spells))
}

fn resolve_spells<S: SpellStore>(
    store: &S,
    selectors: &[SpellSelector],
) -> Result<Vec<SpellRecord>> {
    if selectors.is_empty() {
        store
            .list_names()?
            .into_iter()
            .map(|entry| store.get(entry.id))
            .collect()
    } else {
        spells_by_selectors(store, selectors)
    }
}

fn export_filename() -> String {
    format!("spellbook-{}.json", Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

/// Records are written without ids; importing assigns fresh ones.
fn write_export(path: &Path, spells: &[SpellRecord]) -> Result<()> {
    let records: Vec<SpellRecord> = spells
        .iter()
        .cloned()
        .map(|mut spell| {
            spell.id = None;
            spell
        })
        .collect();
    fs::write(path, serde_json::to_string_pretty(&records)?)?;
    Ok(())
}

/// Default directory for an export when neither a flag nor the config names
/// one.
pub fn default_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpellId;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    #[test]
    fn test_exports_every_spell_by_default() {
        let temp = TempDir::new().unwrap();
        let store = StoreFixture::new().with_samples().store;

        let result = run(&store, &[], temp.path()).unwrap();
        let path = result.export_path.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("spellbook-") && name.ends_with(".json"));

        let written: Vec<SpellRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|s| s.id.is_none()));
        assert_eq!(written[0].name, "Armor of Agathys");
    }

    #[test]
    fn test_exports_selection() {
        let temp = TempDir::new().unwrap();
        let store = StoreFixture::new().with_samples().store;

        let result = run(&store, &[SpellSelector::Id(SpellId(4))], temp.path()).unwrap();
        assert_eq!(result.affected_spells.len(), 1);
        assert_eq!(result.affected_spells[0].name, "Fireball");
    }

    #[test]
    fn test_empty_store_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = InMemoryStore::new();
        let result = run(&store, &[], temp.path()).unwrap();
        assert!(result.export_path.is_none());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
