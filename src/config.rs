//! Command-line and environment settings.
//!
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::timers::DEFAULT_BACKDROPS;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/users/";

/// Terminal front end for a user-record REST API
#[derive(Parser, Debug, Clone)]
#[command(name = "user-records", version, about)]
pub struct Cli {
    /// Collection endpoint of the user-record API
    #[arg(long, env = "USER_RECORDS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Theme file (created with defaults when missing)
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Keybinding file for the records table (created with defaults when missing)
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Backdrop image reference; repeat to build the rotation
    #[arg(long = "background", value_name = "PATH")]
    pub backgrounds: Vec<String>,

    /// Where log output goes while the terminal is in use
    #[arg(long, env = "USER_RECORDS_LOG", default_value = "user-records.log")]
    pub log_file: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }

    /// Backdrop rotation: the `--background` values, or the built-in four.
    pub fn backdrops(&self) -> Vec<String> {
        if self.backgrounds.is_empty() {
            DEFAULT_BACKDROPS.iter().map(|s| s.to_string()).collect()
        } else {
            self.backgrounds.clone()
        }
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::parse_from(["user-records"]);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.backdrops().len(), 4);
        assert_eq!(cli.default_log_filter(), "info");
    }

    #[test]
    fn repeated_backgrounds_replace_defaults() {
        let cli = Cli::parse_from([
            "user-records",
            "--api-url",
            "http://api.test/users/",
            "--background",
            "/a.png",
            "--background",
            "/b.png",
            "-v",
        ]);
        assert_eq!(cli.api_url, "http://api.test/users/");
        assert_eq!(cli.backdrops(), vec!["/a.png", "/b.png"]);
        assert_eq!(cli.default_log_filter(), "debug");
    }
}
