//! Clap derive structures for the `hermie` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of crate-internal imports so `build.rs` can include it directly.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hermie -- switch relays and read sensors on a Hermie controller
#[derive(Debug, Parser)]
#[command(
    name = "hermie",
    version,
    about = "Control and monitor a Hermie enclosure controller",
    long_about = "Command-line client for the Hermie enclosure controller.\n\n\
        Switches the heat and pump relays, reads temperature and humidity\n\
        telemetry, checks controller health, and watches readings against\n\
        configurable comfort thresholds.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "HERMIE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller base URL (overrides profile)
    #[arg(long, short = 'u', env = "HERMIE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides profile and defaults)
    #[arg(
        long,
        env = "HERMIE_TIMEOUT",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HERMIE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Switch relays and show their state
    #[command(alias = "dev", alias = "d")]
    Device(DeviceArgs),

    /// Read the current sensor snapshot
    #[command(alias = "s")]
    Sensor,

    /// Check controller health
    Health,

    /// Sensor snapshot and health, fetched together
    Status,

    /// Poll the sensor and report threshold alerts
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Turn a device on or off
    Set {
        /// Device name (heat, pump)
        device: String,

        /// Desired state (on, off)
        state: String,
    },

    /// Show on/off state for every device
    #[command(alias = "ls")]
    Status,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between sensor polls (default: config poll_interval)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many polls
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Minimum seconds between repeated alerts (default: config buzz_cooldown)
    #[arg(long)]
    pub cooldown: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with a profile for --base-url
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
