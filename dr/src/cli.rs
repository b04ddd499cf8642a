//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;

/// deepresearch - Gemini Deep Research from the command line
#[derive(Debug, Parser)]
#[command(
    name = "dr",
    about = "Plan, run and save a Gemini Deep Research report",
    version
)]
pub struct Cli {
    /// Topic to research (prompted for when omitted)
    pub topic: Option<String>,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// Skip the plan confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Seconds between status polls
    #[arg(long, value_name = "SECS")]
    pub interval_secs: Option<u64>,

    /// Give up after this many minutes of polling
    #[arg(long, value_name = "MINS")]
    pub timeout_mins: Option<u64>,

    /// Directory to write the report into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        debug!(?self.interval_secs, ?self.timeout_mins, ?self.output_dir, "apply_overrides: called");
        if let Some(secs) = self.interval_secs {
            config.poll.interval_ms = millis(Duration::from_secs(secs));
        }
        if let Some(mins) = self.timeout_mins {
            config.poll.timeout_ms = millis(Duration::from_secs(mins.saturating_mul(60)));
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir = dir.clone();
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Interpret the answer to "Proceed? (Y/n)"; anything but "n" proceeds
pub fn confirms(answer: &str) -> bool {
    !answer.trim().eq_ignore_ascii_case("n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topic_and_flags() {
        let cli = Cli::parse_from(["dr", "fusion energy", "-y", "--interval-secs", "5", "--timeout-mins", "30"]);
        assert_eq!(cli.topic.as_deref(), Some("fusion energy"));
        assert!(cli.yes);
        assert_eq!(cli.interval_secs, Some(5));
        assert_eq!(cli.timeout_mins, Some(30));
    }

    #[test]
    fn test_topic_is_optional() {
        let cli = Cli::parse_from(["dr"]);
        assert!(cli.topic.is_none());
        assert!(!cli.yes);
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::parse_from(["dr", "t", "--interval-secs", "2", "--timeout-mins", "1", "-o", "out"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.poll.interval_ms, 2000);
        assert_eq!(config.poll.timeout_ms, 60_000);
        assert_eq!(config.report.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_huge_overrides_saturate() {
        let max = u64::MAX.to_string();
        let cli = Cli::parse_from(["dr", "t", "--interval-secs", &max, "--timeout-mins", &max]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.poll.interval_ms, u64::MAX);
        assert_eq!(config.poll.timeout_ms, u64::MAX);
    }

    #[test]
    fn test_overrides_leave_defaults_alone() {
        let cli = Cli::parse_from(["dr", "t"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.poll.interval_ms, 10_000);
    }

    #[test]
    fn test_confirms() {
        assert!(confirms(""));
        assert!(confirms("y"));
        assert!(confirms("Yes"));
        assert!(!confirms("n"));
        assert!(!confirms(" N "));
    }
}
