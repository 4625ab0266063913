//! # Storage Layer
//!
//! This module defines the storage abstraction for spellbook. The [`SpellStore`]
//! trait allows the application to work with different storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** of the command layer with `InMemoryStore` (no database needed)
//! - Keep business logic **decoupled** from SQL
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: Production storage in an embedded SQLite file
//!   - Four tables: `schools`, `classes`, `spells`, `spell_classes`
//!   - Styled text stored as a text column plus a JSON tags column
//!   - Every operation opens its own connection and runs in one transaction
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Filters through [`FilterSpec::matches`], the reference predicate
//!
//! ## Storage Format
//!
//! For `SqliteStore`:
//! ```text
//! schools(school_id, school_name)            8 fixed rows
//! classes(class_id, class_name)              8 fixed rows
//! spells(spell_id, spell_name, ...)          one row per spell
//! spell_classes(spell_id, class_id)          class membership
//! ```
//!
//! ## Ordering
//!
//! Listings are sorted by spell name (byte order, as SQLite's default
//! collation compares), ties broken by id. Never by insertion order.

use crate::error::Result;
use crate::filter::FilterSpec;
use crate::model::{SpellEntry, SpellId, SpellRecord};

pub mod memory;
pub mod query;
pub mod sqlite;

/// Abstract interface for spell storage.
pub trait SpellStore {
    /// Drop every spell and recreate the storage from scratch.
    fn reset(&mut self) -> Result<()>;

    /// Add a spell, returning its new id. The record's own `id` is ignored.
    fn add(&mut self, record: &SpellRecord) -> Result<SpellId>;

    /// Overwrite an existing spell, keeping its id.
    fn update(&mut self, id: SpellId, record: &SpellRecord) -> Result<()>;

    /// Delete a spell and its class relations.
    fn delete(&mut self, id: SpellId) -> Result<()>;

    /// Load a full spell, with `id` set.
    fn get(&self, id: SpellId) -> Result<SpellRecord>;

    /// All spells, sorted by name.
    fn list_names(&self) -> Result<Vec<SpellEntry>>;

    /// Spells matching the filter, sorted by name.
    fn query(&self, filter: &FilterSpec) -> Result<Vec<SpellEntry>>;
}

pub(crate) fn sort_entries(entries: &mut [SpellEntry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}
