//! Clap derive structures for the `zhome` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zhome -- console for zhome sensor devices
#[derive(Debug, Parser)]
#[command(
    name = "zhome",
    version,
    about = "Configure zhome sensor devices from the command line",
    long_about = "Browse registered devices and their logs, and add sensors to a device.\n\n\
        Sensors are announced to Home Assistant over MQTT; this tool derives\n\
        their topics and hands the configuration to the zhome backend.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "ZHOME_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'S', env = "ZHOME_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZHOME_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZHOME_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

/// Sensor kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// PIR motion sensor (binary_sensor)
    Motion,
    /// Temperature and humidity sensor (sensor)
    Weather,
    /// PWM LED dimmer (light)
    Led,
    /// PWM fan with enable pin (fan)
    Fan,
    /// Push button (button)
    Button,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect registered devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show device logs
    #[command(alias = "log", alias = "l")]
    Logs(LogsArgs),

    /// List and add sensors on a device
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Preview the MQTT topics a sensor would use (offline)
    Topics(TopicsArgs),

    /// Show the MQTT broker details handed out to devices
    Mqtt,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    #[command(alias = "ls")]
    List,

    /// Show one device with its configured sensors
    Show {
        /// Device hardware id or display name
        device: String,
    },

    /// Keep the device list on screen, refreshing on every poll
    Watch,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Args)]
pub struct LogFilterArgs {
    /// Only logs from this device (unit id or display name)
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Only logs at or above this level
    #[arg(long)]
    pub min_level: Option<u8>,

    /// Show at most this many of the newest entries
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List the current device logs
    #[command(alias = "ls")]
    List(LogFilterArgs),

    /// Follow device logs, printing new entries as they arrive
    Watch(LogFilterArgs),
}

// ── Sensors ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SensorsArgs {
    #[command(subcommand)]
    pub command: SensorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SensorsCommand {
    /// List the sensors configured on a device
    #[command(alias = "ls")]
    List {
        /// Device hardware id or display name
        #[arg(long, short = 'd')]
        device: String,
    },

    /// Add a sensor to a device
    ///
    /// Without --kind a menu of sensor kinds is shown. Fields not given
    /// as flags are prompted for, pre-filled with the kind's defaults.
    Add(SensorAddArgs),
}

#[derive(Debug, Args)]
pub struct SensorAddArgs {
    /// Device hardware id or display name
    #[arg(long, short = 'd')]
    pub device: String,

    /// Sensor kind (omit to choose from a menu)
    #[arg(long, short = 'k')]
    pub kind: Option<KindArg>,

    /// Sensor name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// GPIO pin
    #[arg(long)]
    pub pin: Option<String>,

    /// Enable pin (fan)
    #[arg(long)]
    pub enable_pin: Option<String>,

    /// PWM frequency in Hz (led, fan)
    #[arg(long)]
    pub freq: Option<String>,

    /// Retrigger delay in ms (motion, button)
    #[arg(long)]
    pub retrigger_delay: Option<String>,

    /// Measurement interval in ms (weather)
    #[arg(long)]
    pub interval: Option<String>,

    /// Temperature entity name (weather)
    #[arg(long)]
    pub name_temp: Option<String>,

    /// Humidity entity name (weather)
    #[arg(long)]
    pub name_humidity: Option<String>,

    /// Print the sensor configuration instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

// ── Topics ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TopicsArgs {
    /// Device display name
    pub device_name: String,

    /// Sensor name
    pub sensor_name: String,

    /// Sensor kind
    #[arg(long, short = 'k')]
    pub kind: KindArg,

    /// Replace every space in names, not only the first
    #[arg(long)]
    pub all_spaces: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
