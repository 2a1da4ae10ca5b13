//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// DevStats - aggregate your public coding-profile stats into one report
///
/// Fetches GitHub activity and competitive-programming stats (LeetCode,
/// CodeChef, Codeforces) concurrently and renders a Markdown/JSON/text
/// report. Sources that are unreachable fall back to cached snapshot
/// values instead of failing the run.
///
/// Examples:
///   devstats --github octocat
///   devstats --github octocat --codeforces tourist --format json --stdout
///   devstats --offline --stdout --format text
///   devstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub username to fetch stats for
    ///
    /// Also used for platforms without an explicit handle. Can be set via
    /// the GITHUB_HANDLE env var or .devstats.toml config.
    #[arg(short, long, value_name = "HANDLE", env = "GITHUB_HANDLE")]
    pub github: Option<String>,

    /// LeetCode username (defaults to the GitHub handle)
    #[arg(long, value_name = "HANDLE")]
    pub leetcode: Option<String>,

    /// CodeChef username (defaults to the GitHub handle)
    #[arg(long, value_name = "HANDLE")]
    pub codechef: Option<String>,

    /// Codeforces handle (defaults to the GitHub handle)
    #[arg(long, value_name = "HANDLE")]
    pub codeforces: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to devstats_report.md (or the config file setting).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Output format (markdown, json, text)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .devstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    ///
    /// Applies to every source fetch. Default: from config or 15s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Render the fallback snapshot values without any network calls
    #[arg(long)]
    pub offline: bool,

    /// Fail if any source fell back to its cached snapshot
    ///
    /// Useful for CI pipelines. Exit code 2 when a fallback occurred.
    #[arg(long)]
    pub fail_on_fallback: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .devstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// Compact terminal text
    Text,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Offline mode never times out and never falls back "unexpectedly"
        if self.offline && self.fail_on_fallback {
            return Err("--fail-on-fallback is meaningless with --offline".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            github: Some("octocat".to_string()),
            leetcode: None,
            codechef: None,
            codeforces: None,
            output: None,
            stdout: false,
            format: OutputFormat::Markdown,
            config: None,
            timeout: None,
            offline: false,
            fail_on_fallback: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_verbosity() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_offline_fail_on_fallback() {
        let mut args = make_args();
        args.offline = true;
        args.fail_on_fallback = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
