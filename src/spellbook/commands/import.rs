use crate::commands::{create, CmdMessage, CmdResult};
use crate::error::{Result, SpellbookError};
use crate::model::SpellRecord;
use crate::store::SpellStore;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const IMPORT_EXT: &str = "json";

/// An import file holds either one spell or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<SpellRecord>),
    One(Box<SpellRecord>),
}

impl ImportFile {
    fn into_records(self) -> Vec<SpellRecord> {
        match self {
            ImportFile::Many(records) => records,
            ImportFile::One(record) => vec![*record],
        }
    }
}

/// Import spells from JSON files, or from every `.json` file in a directory.
///
/// Files that cannot be read or parsed, and records that fail validation,
/// are skipped with a warning; the rest are still imported.
pub fn run<S: SpellStore>(store: &mut S, paths: Vec<PathBuf>) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for path in paths {
        if path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(&path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == IMPORT_EXT))
                .collect();
            files.sort();
            for file in files {
                import_path(store, &file, &mut result)?;
            }
        } else if path.is_file() {
            import_path(store, &path, &mut result)?;
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        result.affected_spells.len()
    )));
    Ok(result)
}

fn import_path<S: SpellStore>(store: &mut S, path: &Path, result: &mut CmdResult) -> Result<()> {
    let records = match read_file(path) {
        Ok(records) => records,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            result.add_message(CmdMessage::warning(format!(
                "Failed to import {}: {}",
                path.display(),
                e
            )));
            return Ok(());
        }
    };

    for record in records {
        let name = record.name.clone();
        match create::run(store, record) {
            Ok(created) => result.merge(created),
            Err(SpellbookError::Validation(msg)) => {
                warn!("Skipping spell \"{}\" from {}: {}", name, path.display(), msg);
                result.add_message(CmdMessage::warning(format!(
                    "Skipped \"{}\": {}",
                    name, msg
                )));
            }
            Err(e) => return Err(e),
        }
    }
    result.add_message(CmdMessage::info(format!("Imported: {}", path.display())));
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<SpellRecord>> {
    let content = fs::read_to_string(path)?;
    let file: ImportFile = serde_json::from_str(&content)?;
    Ok(file.into_records())
}
