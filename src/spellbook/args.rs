use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spellbook")]
#[command(about = "A personal spell reference", long_about = None, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database file (overrides the configured one)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create (or wipe) the spell database
    Init {
        /// Add the sample spells afterwards
        #[arg(long)]
        seed: bool,
    },

    /// List spells, optionally filtered
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show full spell cards
    #[command(alias = "v")]
    View {
        /// Spell ids, or a spell name
        #[arg(required = true, num_args = 1..)]
        spells: Vec<String>,

        /// Print cards as Markdown instead of styled text
        #[arg(long)]
        markdown: bool,
    },

    /// Add a spell
    #[command(alias = "n")]
    Add {
        /// Name of the spell
        name: String,

        #[command(flatten)]
        fields: SpellFields,
    },

    /// Change fields of a spell
    #[command(alias = "e")]
    Edit {
        /// Spell id, or a spell name
        #[arg(required = true, num_args = 1..)]
        spells: Vec<String>,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: SpellFields,
    },

    /// Delete one or more spells
    #[command(alias = "rm")]
    Delete {
        /// Spell ids, or a spell name
        #[arg(required = true, num_args = 1..)]
        spells: Vec<String>,
    },

    /// Add the bundled sample spells
    Seed,

    /// Write spells to a JSON file
    Export {
        /// Spell ids, or a spell name (all spells if omitted)
        spells: Vec<String>,

        /// Directory to write into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Add spells from JSON files or directories
    Import {
        /// Paths to files or directories to import
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (database, export-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only spells of these classes (repeatable, or comma separated)
    #[arg(short, long = "class", value_delimiter = ',')]
    pub classes: Vec<String>,

    /// Only spells of this level (0-9, "Cantrip", "3rd")
    #[arg(short, long)]
    pub level: Option<String>,

    /// Only spells of this school
    #[arg(short, long)]
    pub school: Option<String>,

    /// Only ritual spells
    #[arg(long, conflicts_with = "no_ritual")]
    pub ritual: bool,

    /// Only non-ritual spells
    #[arg(long)]
    pub no_ritual: bool,
}

/// Spell fields settable from the command line. Styled fields take Markdown
/// emphasis (`**bold**`, `*italic*`).
#[derive(Args, Debug, Default)]
pub struct SpellFields {
    /// Level (0-9, "Cantrip", "3rd")
    #[arg(long)]
    pub level: Option<String>,

    /// School of magic
    #[arg(long)]
    pub school: Option<String>,

    /// Whether the spell is a ritual
    #[arg(long, value_name = "BOOL")]
    pub ritual: Option<bool>,

    /// Casting time ("1 action", "bonus action", "10 minutes")
    #[arg(long, value_name = "TIME")]
    pub cast_time: Option<String>,

    /// Range ("Self", "Touch", "30 feet")
    #[arg(long)]
    pub range: Option<String>,

    /// Whether the spell needs concentration
    #[arg(long, value_name = "BOOL")]
    pub concentration: Option<bool>,

    /// Duration ("Instantaneous", "1 minute")
    #[arg(long)]
    pub duration: Option<String>,

    /// Components as letters ("VSM", "V, S")
    #[arg(long)]
    pub components: Option<String>,

    /// Material components
    #[arg(long)]
    pub materials: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Effect when cast with a higher slot
    #[arg(long)]
    pub higher_levels: Option<String>,

    /// Classes that can learn the spell, comma separated ("" for none)
    #[arg(long)]
    pub classes: Option<String>,
}
