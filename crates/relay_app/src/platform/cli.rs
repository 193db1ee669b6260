use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::logging::LogDestination;

/// Relays forum activity to Discord and to the forum's news ticker.
#[derive(Debug, Parser)]
#[command(name = "forum-relay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "FORUM_RELAY_CONFIG", default_value = "forum_relay.json")]
    pub config: PathBuf,

    /// Directory holding the state files between runs.
    #[arg(long, env = "FORUM_RELAY_STATE_DIR", default_value = ".")]
    pub state_dir: PathBuf,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "terminal")]
    pub log: LogDestination,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = "forum_relay.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,

    /// Job to run.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Post new category replies to Discord with a generated summary.
    News,
    /// Refresh the theme's news ticker from the newest topic headlines.
    Ticker,
    /// Mirror the status page into one Discord message.
    Status(StatusArgs),
    /// Mark the status message as shutting down.
    Shutdown,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Check once and exit instead of polling.
    #[arg(long)]
    pub once: bool,
}

impl Command {
    /// Label attached to every log line of this job.
    pub fn label(&self) -> &'static str {
        match self {
            Command::News => "news",
            Command::Ticker => "ticker",
            Command::Status(_) => "status",
            Command::Shutdown => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_subcommand() {
        let cli = Cli::parse_from([
            "forum-relay",
            "--config",
            "/etc/relay.json",
            "--state-dir",
            "/var/lib/relay",
            "--log",
            "both",
            "-v",
            "status",
            "--once",
        ]);
        assert_eq!(cli.config, PathBuf::from("/etc/relay.json"));
        assert_eq!(cli.state_dir, PathBuf::from("/var/lib/relay"));
        assert_eq!(cli.log, LogDestination::Both);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Status(StatusArgs { once: true })));
        assert_eq!(cli.command.label(), "status");
    }

    #[test]
    fn ticker_needs_no_extra_arguments() {
        let cli = Cli::parse_from(["forum-relay", "ticker"]);
        assert!(matches!(cli.command, Command::Ticker));
        assert_eq!(cli.log, LogDestination::Terminal);
    }
}
