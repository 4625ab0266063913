//! # Spellbook Architecture
//!
//! Spellbook is a **UI-agnostic spell reference library**: a persistent store
//! of tabletop spells with styled description text and filtered listings. The
//! `spellbook` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (typed selectors → ids or names)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business rules (name de-duplication, import, export)     │
//! │  - Operates on Rust types, returns `CmdResult`              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract SpellStore trait                                │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Styled Text
//!
//! Descriptions, materials and higher-level notes are [`tagged_text::TaggedText`]:
//! plain text plus named style ranges addressed by `"line.column"` positions.
//! The store keeps the text and a JSON map of the ranges in two columns.
//! [`display`] composes fields into one styled card; [`markup`] converts to
//! and from Markdown emphasis for editing.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through the `log` facade; the binary decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, SQLite and in-memory implementations
//! - [`model`]: Spell record, enumerations and derived views
//! - [`filter`]: Listing filters
//! - [`tagged_text`]: Styled text and its position arithmetic
//! - [`display`]: Spell card composition
//! - [`markup`]: Markdown conversion
//! - [`samples`]: Bundled sample spells
//! - [`config`]: Configuration management
//! - [`init`]: Data directory and context setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod init;
pub mod markup;
pub mod model;
pub mod samples;
pub mod store;
pub mod tagged_text;
