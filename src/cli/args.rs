//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build breadcrumb-labelled trees from flat parent-referencing JSON records
#[derive(Parser, Debug)]
#[command(name = "pathtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Field holding the record id
    #[arg(long, global = true)]
    pub id_field: Option<String>,

    /// Field holding the parent id
    #[arg(long, global = true)]
    pub parent_field: Option<String>,

    /// Field holding the display title
    #[arg(long, global = true)]
    pub title_field: Option<String>,

    /// Separator between path segments
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// Sort siblings by title
    #[arg(long, global = true)]
    pub by_title: bool,

    /// Fail on parent cycles instead of treating the record as a root
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest as trees
    Tree {
        /// JSON input (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List path labels in pre-order
    Labels {
        /// JSON input (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Prefix each label with its record id
        #[arg(long)]
        ids: bool,
    },

    /// List path labels whose title matches a pattern
    Search {
        /// Case-insensitive title fragment
        pattern: String,
        /// JSON input (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List path labels of leaf records
    Leaves {
        /// JSON input (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
