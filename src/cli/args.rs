//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Tree inventory mapper: spreadsheet + boundary shapefile to an interactive HTML map
#[derive(Parser, Debug)]
#[command(name = "arbormap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Site directory holding the inventory workbook (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub site_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the site's tree map
    Build {
        /// Output file (default: <Site_Name>_tree_map.html in the site directory)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Worksheet holding the inventory
        #[arg(long)]
        sheet: Option<String>,

        /// Skip photo lookup even if a photo directory exists
        #[arg(long)]
        no_photos: bool,
    },

    /// Show located inputs, record counts and the genus legend
    Inspect,

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
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
