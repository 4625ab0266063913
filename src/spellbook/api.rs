//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for spellbook operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (user-typed selectors become [`SpellSelector`]s)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business rules; those live in
//! `commands/*.rs`.
//!
//! ## Generic Over SpellStore
//!
//! `SpellbookApi<S: SpellStore>` is generic over the storage backend:
//! - Production: `SpellbookApi<SqliteStore>`
//! - Testing: `SpellbookApi<InMemoryStore>`

use crate::commands;
use crate::config::SpellbookConfig;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::model::{SpellId, SpellRecord};
use crate::store::SpellStore;
use std::path::{Path, PathBuf};

/// The main API facade for spellbook operations.
pub struct SpellbookApi<S: SpellStore> {
    store: S,
    paths: commands::SpellbookPaths,
}

impl<S: SpellStore> SpellbookApi<S> {
    pub fn new(store: S, paths: commands::SpellbookPaths) -> Self {
        Self { store, paths }
    }

    pub fn list_spells(&self, filter: &FilterSpec) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn view_spells<I: AsRef<str>>(&self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs);
        commands::view::run(&self.store, &selectors)
    }

    pub fn create_spell(&mut self, record: SpellRecord) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, record)
    }

    pub fn update_spell<I: AsRef<str>>(
        &mut self,
        inputs: &[I],
        record: SpellRecord,
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs);
        commands::update::run(&mut self.store, &selectors, record)
    }

    pub fn delete_spells<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs);
        commands::delete::run(&mut self.store, &selectors)
    }

    pub fn init(&mut self, with_samples: bool) -> Result<commands::CmdResult> {
        commands::init::run(&mut self.store, with_samples)
    }

    pub fn seed(&mut self) -> Result<commands::CmdResult> {
        commands::seed::run(&mut self.store)
    }

    /// Export to `out_dir`, else the configured export directory, else the
    /// current directory.
    pub fn export_spells<I: AsRef<str>>(
        &self,
        inputs: &[I],
        out_dir: Option<&Path>,
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs);
        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => SpellbookConfig::load(self.paths.data_dir())?
                .export_path(self.paths.data_dir())
                .unwrap_or_else(commands::export::default_dir),
        };
        commands::export::run(&self.store, &selectors, &dir)
    }

    pub fn import_spells(&mut self, paths: Vec<PathBuf>) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, paths)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::SpellbookPaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Inputs that are all integers are ids; anything else is joined into a
/// single spell name.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Vec<SpellSelector> {
    let all_ids: std::result::Result<Vec<i64>, _> =
        inputs.iter().map(|s| s.as_ref().trim().parse::<i64>()).collect();

    if let Ok(ids) = all_ids {
        return ids.into_iter().map(|id| SpellSelector::Id(SpellId(id))).collect();
    }

    let name = inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    vec![SpellSelector::Name(name)]
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, SpellSelector, SpellbookPaths};
