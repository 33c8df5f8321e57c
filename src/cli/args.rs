//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Inspect password-database outlines as group/entry trees
#[derive(Parser, Debug)]
#[command(name = "kdbtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the group/entry tree of an outline
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Count groups and entries
    Stats {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List entries whose expiry time has passed
    Expired {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Create a new outline with an empty root group
    Init {
        /// Outline file to create
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Name of the root group
        #[arg(short, long, default_value = "Root")]
        name: String,
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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print an annotated config file
    Template,
    /// Show the global config file location
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented tree
    Tree,
    /// Normalized TOML outline
    Toml,
}
