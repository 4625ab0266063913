use crate::config::SpellbookConfig;
use crate::model::{SpellEntry, SpellId, SpellRecord};
use std::path::{Path, PathBuf};

pub mod config;
pub mod create;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod import;
pub mod init;
pub mod list;
pub mod seed;
pub mod update;
pub mod view;

#[derive(Debug, Clone)]
pub struct SpellbookPaths {
    pub data_dir: PathBuf,
}

impl SpellbookPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// How a command refers to spells: by id, or by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellSelector {
    Id(SpellId),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Full records written or shown by the command.
    pub affected_spells: Vec<SpellRecord>,
    pub listed_spells: Vec<SpellEntry>,
    pub config: Option<SpellbookConfig>,
    pub export_path: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_spells(mut self, spells: Vec<SpellRecord>) -> Self {
        self.affected_spells = spells;
        self
    }

    pub fn with_listed_spells(mut self, spells: Vec<SpellEntry>) -> Self {
        self.listed_spells = spells;
        self
    }

    pub fn with_config(mut self, config: SpellbookConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    /// Fold another command's output into this one.
    pub fn merge(&mut self, other: CmdResult) {
        self.affected_spells.extend(other.affected_spells);
        self.listed_spells.extend(other.listed_spells);
        self.messages.extend(other.messages);
    }
}
