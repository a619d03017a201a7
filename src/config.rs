//! Per-spawn process configuration.
//!
//! All configuration is explicit and owned by one spawn call. The driver
//! never mutates the parent's working directory or environment, so spawns
//! stay composable and safe to run concurrently.

use std::path::{Path, PathBuf};

/// Disposition of the child's stderr stream.
///
/// Stdin and stdout are always piped; the driver needs both. Stderr is not
/// scanned for prompts either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StderrMode {
    /// The child writes straight to the parent's stderr.
    #[default]
    Inherit,
    /// The child's stderr is discarded.
    Null,
}

/// How the child is attached to the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Backend {
    /// Ordinary pipes. Stderr stays a separate stream.
    #[default]
    Pipe,
    /// A pseudo-terminal. Needed for children that only prompt when stdout
    /// is a TTY; stderr is merged into the PTY stream.
    Pty,
}

/// Configuration for one child process spawn.
///
/// ```no_run
/// use unattend::{SpawnConfig, StderrMode};
///
/// let config = SpawnConfig::new("ember")
///     .arg("install")
///     .arg("ember-electron")
///     .current_dir("/tmp/ee-test-app")
///     .env("CI", "true")
///     .stderr(StderrMode::Inherit);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpawnConfig {
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) env: Vec<(String, String)>,
    pub(crate) stderr: StderrMode,
    pub(crate) backend: Backend,
}

impl SpawnConfig {
    /// Start configuring a spawn of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir` instead of the parent's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child. The parent's environment
    /// is inherited; entries set here override it.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Choose what happens to the child's stderr.
    pub fn stderr(mut self, mode: StderrMode) -> Self {
        self.stderr = mode;
        self
    }

    /// Attach the child to a pseudo-terminal instead of plain pipes.
    pub fn pty(mut self, enabled: bool) -> Self {
        self.backend = if enabled { Backend::Pty } else { Backend::Pipe };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args() {
        let config = SpawnConfig::new("ember")
            .arg("new")
            .args(["ee-test-app", "--yarn"]);
        assert_eq!(config.program, "ember");
        assert_eq!(config.args, ["new", "ee-test-app", "--yarn"]);
    }

    #[test]
    fn test_defaults() {
        let config = SpawnConfig::new("true");
        assert_eq!(config.stderr, StderrMode::Inherit);
        assert_eq!(config.backend, Backend::Pipe);
        assert!(config.cwd.is_none());
        assert!(config.env.is_empty());
    }

    #[test]
    fn test_env_and_cwd() {
        let config = SpawnConfig::new("sh").current_dir("/tmp").env("CI", "1");
        assert_eq!(config.cwd.as_deref(), Some(std::path::Path::new("/tmp")));
        assert_eq!(config.env, [("CI".to_string(), "1".to_string())]);
    }
}
