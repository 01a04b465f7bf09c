//! Command-line interface of `hvtools`.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hvtools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer workflow tools for the Havtorn engine")]
pub struct Cli {
    /// Engine repository root
    #[arg(long, global = true, default_value = ".")]
    pub root: String,

    /// Config file, instead of ProjectSetup/hvtools.json under the root
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check and install prerequisites, then generate project files
    Setup {
        /// Do not register the URL protocol handler
        #[arg(long)]
        skip_deeplink: bool,
        /// Do not update git submodules
        #[arg(long)]
        skip_submodules: bool,
    },
    /// Report which prerequisites are installed
    Detect {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the URL protocol handler
    Deeplink {
        #[command(subcommand)]
        action: DeeplinkAction,
    },
    /// Run the project file generation script
    Regenerate,
    /// Inspect the build-file list
    BuildList {
        #[command(subcommand)]
        action: BuildListAction,
    },
    /// Interactively add source files
    Scaffold {
        /// Start in this main folder instead of asking
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Manage file templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },
    /// Manage the tools config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeeplinkAction {
    Install,
    Uninstall,
}

#[derive(Debug, Subcommand)]
pub enum BuildListAction {
    /// Print a build list rendered from the files on disk
    Preview,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesAction {
    /// Create a template from existing files
    Create,
    List,
    Remove { name: String },
    /// Write the built-in templates to the store
    Init,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write the default config
    Init,
    /// Print the effective config
    Show,
}
