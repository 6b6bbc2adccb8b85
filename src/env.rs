use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Read-only snapshot of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: the environment variables, in the order the process stores them.
/// - `current_dir`: the working directory relative paths are resolved against.
/// - `program`: the name the shell was invoked as, used in diagnostics.
///
/// Nothing in the crate mutates a snapshot once it is built; it is passed by
/// reference into resolution and process launching.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: Vec<(OsString, OsString)>,
    current_dir: PathBuf,
    program: String,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars_os()` and initializes `current_dir`
    /// from `std::env::current_dir()`.
    pub fn capture(program: impl Into<String>) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_vars(program, stdenv::vars_os(), current_dir)
    }

    /// Build a snapshot from explicit variables.
    pub fn from_vars<I, K, V>(program: impl Into<String>, vars: I, current_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            current_dir: current_dir.into(),
            program: program.into(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Entries in storage order.
    pub fn vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}
