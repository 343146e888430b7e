//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CPC title-list parser: rebuilds the classification hierarchy and flattens root-to-leaf paths
#[derive(Parser, Debug)]
#[command(name = "cpctree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output (-d, -dd, -ddd for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Data directory with title list files (default: from config)
    #[arg(short = 'C', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output directory for export artifacts (default: from config)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse title lists and write both export artifacts (the default)
    Run,

    /// Print the hierarchy as a tree
    Tree,

    /// Print root-to-leaf paths linearly
    Paths,

    /// Show source and hierarchy statistics
    Info,

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

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
