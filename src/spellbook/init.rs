use crate::api::{SpellbookApi, SpellbookPaths};
use crate::config::SpellbookConfig;
use crate::error::{Result, SpellbookError};
use crate::store::sqlite::SqliteStore;
use directories::ProjectDirs;
use log::debug;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Overrides the platform data directory when set.
pub const HOME_ENV: &str = "SPELLBOOK_HOME";

pub struct SpellbookContext {
    pub api: SpellbookApi<SqliteStore>,
    pub config: SpellbookConfig,
    pub database: PathBuf,
}

/// `$SPELLBOOK_HOME`, or the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    data_dir_from(std::env::var_os(HOME_ENV))
}

fn data_dir_from(home: Option<OsString>) -> Result<PathBuf> {
    if let Some(home) = home.filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "spellbook", "spellbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SpellbookError::Store("Could not determine data directory".to_string()))
}

/// Load config and open the database, creating it on first use.
///
/// `database` overrides the configured database path.
pub fn initialize(data_dir: PathBuf, database: Option<PathBuf>) -> Result<SpellbookContext> {
    fs::create_dir_all(&data_dir)?;
    let config = SpellbookConfig::load(&data_dir)?;
    let database = database.unwrap_or_else(|| config.database_path(&data_dir));
    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!("Using database {}", database.display());

    let store = SqliteStore::open_or_create(&database)?;
    let api = SpellbookApi::new(store, SpellbookPaths::new(data_dir));

    Ok(SpellbookContext {
        api,
        config,
        database,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSpec;
    use tempfile::TempDir;

    #[test]
    fn test_home_override() {
        let dir = data_dir_from(Some(OsString::from("/tmp/spells"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/spells"));
    }

    #[test]
    fn test_empty_home_falls_back() {
        // Platform lookup can fail in minimal environments; either way the
        // empty override must not be used.
        if let Ok(dir) = data_dir_from(Some(OsString::new())) {
            assert_ne!(dir, PathBuf::new());
        }
    }

    #[test]
    fn test_initialize_creates_database() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");

        let ctx = initialize(data.clone(), None).unwrap();
        assert_eq!(ctx.database, data.join("spellbook.sqlite3"));
        assert!(ctx.database.exists());
        assert!(ctx
            .api
            .list_spells(&FilterSpec::new())
            .unwrap()
            .listed_spells
            .is_empty());
    }

    #[test]
    fn test_initialize_keeps_existing_spells() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("custom").join("spells.db");

        let mut ctx = initialize(temp.path().to_path_buf(), Some(db.clone())).unwrap();
        ctx.api.seed().unwrap();

        let ctx = initialize(temp.path().to_path_buf(), Some(db)).unwrap();
        let listed = ctx.api.list_spells(&FilterSpec::new()).unwrap();
        assert_eq!(listed.listed_spells.len(), 4);
    }
}
