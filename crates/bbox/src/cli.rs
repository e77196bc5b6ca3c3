//! Clap derive structures for the `bbox` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bbox -- read status from a Bouygues Telecom Bbox router
#[derive(Debug, Parser)]
#[command(
    name = "bbox",
    version,
    about = "Query a Bbox router's local management API",
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
    /// API root URL (overrides config), e.g. https://192.168.1.254/api/v1/
    #[arg(long, short = 'u', global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<u64>,

    /// Accept the router's self-signed TLS certificate
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Read(ReadCommand),

    /// Manage the configuration file and stored password
    Config(ConfigArgs),
}

/// Commands that talk to the router under one login.
#[derive(Debug, Subcommand)]
pub enum ReadCommand {
    /// Show router model, firmware and uptime
    #[command(alias = "router")]
    Device,

    /// List hosts known to the router
    Hosts(HostsArgs),

    /// Show WAN IP receive/transmit counters
    #[command(name = "wan-stats", alias = "wan")]
    WanStats,

    /// Log in once and run every read, reporting a summary
    Check,
}

#[derive(Debug, Args)]
pub struct HostsArgs {
    /// Only show hosts currently connected
    #[arg(long, short = 'a')]
    pub active: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    Path,

    /// Show the effective config with secrets masked
    Show,

    /// Read the router password from stdin and store it in the system keyring
    SetPassword,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bbox", "hosts", "--active", "-k", "-o", "json"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.global.insecure);
        assert!(matches!(cli.global.output, OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Command::Read(ReadCommand::Hosts(HostsArgs { active: true }))
        ));
    }
}
