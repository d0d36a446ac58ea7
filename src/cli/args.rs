//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::AdjustmentKind;

/// Annual program adjustments: add, remove and re-block teaching units per grouping
#[derive(Parser, Debug)]
#[command(name = "curov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory searched for a local .curov.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Catalog file (overrides catalog_file)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Adjustment store directory (overrides data_dir)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Program targeted by a command.
#[derive(Args, Debug, Clone)]
pub struct ProgramArgs {
    /// Program code, e.g. LECGE100B
    pub program: String,

    /// Academic year (default: default_year from config)
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add units to a grouping
    Add {
        #[command(flatten)]
        target: ProgramArgs,
        /// Grouping receiving the units
        grouping: String,
        /// Unit codes
        #[arg(required = true)]
        units: Vec<String>,
        /// Record the units as placed after this unit
        #[arg(long, conflicts_with = "after_grouping")]
        after_unit: Option<String>,
        /// Record the units as placed after this grouping
        #[arg(long)]
        after_grouping: Option<String>,
    },

    /// Remove units from a grouping
    Remove {
        #[command(flatten)]
        target: ProgramArgs,
        /// Grouping losing the units
        grouping: String,
        /// Unit codes
        #[arg(required = true)]
        units: Vec<String>,
    },

    /// Change the block of units in a grouping
    Modify {
        #[command(flatten)]
        target: ProgramArgs,
        /// Grouping containing the units
        grouping: String,
        /// Changes as UNIT=BLOCK
        #[arg(required = true)]
        changes: Vec<String>,
    },

    /// Drop one adjustment of a unit
    Cancel {
        #[command(flatten)]
        target: ProgramArgs,
        /// Grouping of the adjustment
        grouping: String,
        /// Unit code
        unit: String,
        /// Adjustment kind: added, removed or modified
        #[arg(short, long)]
        kind: AdjustmentKind,
    },

    /// Drop every adjustment of a program
    Reinit {
        #[command(flatten)]
        target: ProgramArgs,
    },

    /// Show the adjusted program as a tree, or one grouping's content
    Show {
        #[command(flatten)]
        target: ProgramArgs,
        /// Show the content rows of this grouping only
        #[arg(short, long)]
        grouping: Option<String>,
    },

    /// Show the condensed adjusted program (groupings and units)
    Program {
        #[command(flatten)]
        target: ProgramArgs,
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
