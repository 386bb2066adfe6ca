//! Command-line options.

use crate::infrastructure::expand_tilde;
use crate::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal front-end for the Dashlane CLI.
#[derive(Debug, Parser)]
#[command(name = "dashview", author, version, about, long_about = None)]
pub struct Cli {
    /// `dcli` executable name or path
    #[arg(long, value_name = "PATH")]
    pub dcli: Option<String>,

    /// Seconds to wait for `dcli password list`
    #[arg(long, value_name = "SECS")]
    pub list_timeout: Option<u64>,

    /// Seconds to wait for `dcli accounts whoami`
    #[arg(long, value_name = "SECS")]
    pub whoami_timeout: Option<u64>,

    /// Seconds to wait for `dcli --version`
    #[arg(long, value_name = "SECS")]
    pub version_timeout: Option<u64>,

    /// Built-in theme: `dashlane` or `dashlane-light`
    #[arg(long, value_name = "NAME", conflicts_with = "theme_file")]
    pub theme: Option<String>,

    /// Custom TOML theme file
    #[arg(long, value_name = "PATH", value_parser = parse_path)]
    pub theme_file: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `dashview=debug` (RUST_LOG wins)
    #[arg(long, value_name = "FILTER")]
    pub trace_level: Option<String>,

    /// Settings file [default: <config dir>/dashview/settings.toml]
    #[arg(long, value_name = "PATH", value_parser = parse_path)]
    pub settings: Option<PathBuf>,

    /// Log and trace directory [default: <data dir>/dashview]
    #[arg(long, value_name = "DIR", value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_path(value: &str) -> Result<PathBuf, String> {
    Ok(expand_tilde(value))
}

impl Cli {
    /// Applies the options on top of the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clap::Parser;
    /// use dashview::cli::Cli;
    /// use std::time::Duration;
    ///
    /// let config = Cli::parse_from(["dashview", "--dcli", "/opt/dcli", "--list-timeout", "60"]).into_config();
    /// assert_eq!(config.tool.binary, "/opt/dcli");
    /// assert_eq!(config.tool.list_timeout, Duration::from_secs(60));
    /// ```
    #[must_use]
    pub fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(binary) = self.dcli {
            config.tool.binary = binary;
        }
        if let Some(secs) = self.list_timeout {
            config.tool.list_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.whoami_timeout {
            config.tool.whoami_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.version_timeout {
            config.tool.version_timeout = Duration::from_secs(secs);
        }
        config.theme_name = self.theme;
        config.theme_file = self.theme_file;
        config.trace_level = self.trace_level;
        config.settings_path = self.settings;
        config.data_dir = self.data_dir;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fill_tool_and_paths() {
        let config = Cli::try_parse_from([
            "dashview",
            "--dcli",
            "./bin/dcli",
            "--whoami-timeout",
            "3",
            "--settings",
            "/tmp/dv/settings.toml",
        ])
        .unwrap()
        .into_config();

        assert_eq!(config.tool.binary, "./bin/dcli");
        assert_eq!(config.tool.whoami_timeout, Duration::from_secs(3));
        assert_eq!(config.tool.list_timeout, Duration::from_secs(30));
        assert_eq!(
            config.resolve_settings_path().unwrap(),
            PathBuf::from("/tmp/dv/settings.toml")
        );
    }

    #[test]
    fn no_options_means_defaults() {
        let config = Cli::try_parse_from(["dashview"]).unwrap().into_config();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn bad_options_are_rejected() {
        assert!(Cli::try_parse_from(["dashview", "--colour", "red"]).is_err());
        assert!(Cli::try_parse_from(["dashview", "--list-timeout", "soon"]).is_err());
        assert!(Cli::try_parse_from(["dashview", "--theme", "dashlane", "--theme-file", "t.toml"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
