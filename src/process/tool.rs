//! Concrete command lines for the Dashlane CLI.

use super::executor::CommandSpec;
use std::time::Duration;

/// Where to download `dcli` from, shown when it is missing.
pub const INSTALL_URL: &str = "https://cli.dashlane.com/";

/// Extra filter characters appended to the alphabet and digits for the
/// broad-filter sweep.
pub const BROAD_FILTER_EXTRA: [char; 3] = ['æ', 'ø', 'å'];

/// Binary name and time budgets for each `dcli` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Executable name or path.
    pub binary: String,
    /// Budget for `dcli --version`.
    pub version_timeout: Duration,
    /// Budget for `dcli accounts whoami`.
    pub whoami_timeout: Duration,
    /// Budget for `dcli password list`.
    pub list_timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: "dcli".to_string(),
            version_timeout: Duration::from_secs(5),
            whoami_timeout: Duration::from_secs(10),
            list_timeout: Duration::from_secs(30),
        }
    }
}

impl ToolConfig {
    /// `dcli --version`, the existence probe.
    #[must_use]
    pub fn version_command(&self) -> CommandSpec {
        CommandSpec::captured(&self.binary, ["--version"], self.version_timeout)
    }

    /// `dcli accounts whoami`, the authentication probe.
    #[must_use]
    pub fn whoami_command(&self) -> CommandSpec {
        CommandSpec::captured(&self.binary, ["accounts", "whoami"], self.whoami_timeout)
    }

    /// `dcli sync`, run interactively so the operator can log in.
    #[must_use]
    pub fn sync_command(&self) -> CommandSpec {
        CommandSpec::interactive(&self.binary, ["sync"])
    }

    /// `dcli password list ... --output json`.
    #[must_use]
    pub fn list_command(&self, term: &str) -> CommandSpec {
        CommandSpec::captured(&self.binary, list_arguments(term), self.list_timeout)
    }

    /// The whoami command line as plain strings, for launching in a terminal.
    #[must_use]
    pub fn whoami_argv(&self) -> Vec<String> {
        vec![self.binary.clone(), "accounts".to_string(), "whoami".to_string()]
    }
}

/// Arguments for `password list`.
///
/// A non-empty term is passed as the only filter. An empty term expands to the
/// broad-filter sweep since the tool requires at least one filter per call.
///
/// # Examples
///
/// ```
/// use dashview::process::tool::list_arguments;
///
/// assert_eq!(list_arguments("bank"), ["password", "list", "bank", "--output", "json"]);
/// assert_eq!(list_arguments("").len(), 2 + 26 + 10 + 3 + 2);
/// ```
#[must_use]
pub fn list_arguments(term: &str) -> Vec<String> {
    let mut args = vec!["password".to_string(), "list".to_string()];
    if term.is_empty() {
        args.extend(('a'..='z').map(String::from));
        args.extend(('0'..='9').map(String::from));
        args.extend(BROAD_FILTER_EXTRA.iter().map(|c| c.to_string()));
    } else {
        args.push(term.to_string());
    }
    args.extend(["--output".to_string(), "json".to_string()]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExecMode;

    #[test]
    fn broad_sweep_covers_alphabet_digits_and_accents() {
        let args = list_arguments("");
        assert_eq!(&args[..3], ["password", "list", "a"]);
        assert!(args.contains(&"z".to_string()));
        assert!(args.contains(&"0".to_string()));
        assert!(args.contains(&"å".to_string()));
        assert_eq!(&args[args.len() - 2..], ["--output", "json"]);
    }

    #[test]
    fn sync_is_interactive_and_probes_are_bounded() {
        let tool = ToolConfig::default();
        assert_eq!(tool.sync_command().mode, ExecMode::Interactive);
        assert_eq!(
            tool.whoami_command().mode,
            ExecMode::Captured { timeout: Duration::from_secs(10) }
        );
        assert_eq!(
            tool.version_command().mode,
            ExecMode::Captured { timeout: Duration::from_secs(5) }
        );
    }
}
