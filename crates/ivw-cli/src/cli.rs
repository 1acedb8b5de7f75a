//! CLI argument definitions for `ivw`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ivw",
    version,
    about = "Inspect and upgrade Inviwo workspace files",
    long_about = "Inspect and upgrade Inviwo workspace files.\n\n\
                  Reports the module versions a workspace was saved with and runs\n\
                  the registered converters to bring older workspaces up to date."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show module versions and property values of a workspace.
    Inspect(InspectArgs),

    /// Run version converters on a workspace.
    Upgrade(UpgradeArgs),

    /// List the modules this tool can upgrade.
    Modules,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Workspace file to read.
    #[arg(value_name = "WORKSPACE")]
    pub workspace: PathBuf,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct UpgradeArgs {
    /// Workspace file to upgrade.
    #[arg(value_name = "WORKSPACE")]
    pub workspace: PathBuf,

    /// Write the upgraded workspace here instead of over the input.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Spaces per indentation level of the written XML (0 for a single line).
    #[arg(long = "indent", default_value_t = 2)]
    pub indent: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
