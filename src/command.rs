use crate::env::Environment;
use crate::lexer::ArgumentVector;
use anyhow::Result;
use std::fmt::Display;
use std::io::{self, Write};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells.
pub type ExitCode = i32;

/// Fixed exit statuses produced by the shell itself.
pub mod status {
    use super::ExitCode;

    pub const SUCCESS: ExitCode = 0;
    /// A command failed for a reason other than those below.
    pub const FAILURE: ExitCode = 1;
    /// The child process could not be created.
    pub const SPAWN_FAILED: ExitCode = 1;
    /// Malformed argument to `exit`.
    pub const ILLEGAL_NUMBER: ExitCode = 2;
    pub const PERMISSION_DENIED: ExitCode = 126;
    pub const NOT_FOUND: ExitCode = 127;
}

/// How a processed command concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Record the status and keep reading lines.
    Continue(ExitCode),
    /// Stop processing input; the process should exit with this code.
    Terminate(ExitCode),
}

impl Outcome {
    pub fn code(self) -> ExitCode {
        match self {
            Outcome::Continue(code) | Outcome::Terminate(code) => code,
        }
    }
}

/// Abstraction over a writable output stream that child processes may share.
///
/// The process's own standard streams are handed to children directly. Any other
/// stream receives the child's output once it has exited.
pub trait OutputStream: Write {
    /// Whether a child process can inherit this stream as-is.
    fn is_inherited(&self) -> bool {
        false
    }
}

impl OutputStream for io::Stdout {
    fn is_inherited(&self) -> bool {
        true
    }
}

impl OutputStream for io::Stderr {
    fn is_inherited(&self) -> bool {
        true
    }
}

impl OutputStream for Vec<u8> {}

/// The pair of output streams commands write to.
pub struct Streams {
    pub stdout: Box<dyn OutputStream>,
    pub stderr: Box<dyn OutputStream>,
}

impl Streams {
    pub fn new(stdout: Box<dyn OutputStream>, stderr: Box<dyn OutputStream>) -> Self {
        Self { stdout, stderr }
    }

    /// The process's standard output and standard error.
    pub fn inherited() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Write a diagnostic line in the shell's fixed format:
    /// `<prog>: 1: <command>: <message>`.
    pub fn diagnose(
        &mut self,
        env: &Environment,
        command: &str,
        message: impl Display,
    ) -> io::Result<()> {
        writeln!(self.stderr, "{}: 1: {}: {}", env.program(), command, message)?;
        self.stderr.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.stderr.flush()
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(self: Box<Self>, streams: &mut Streams, env: &Environment) -> Result<Outcome>;
}

/// Factory that tries to create a command from an argument vector.
///
/// Returns `None` when the factory doesn't recognize the command name.
/// Implementations can use the environment to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided arguments.
    fn try_create(
        &self,
        env: &Environment,
        argv: &ArgumentVector,
    ) -> Option<Box<dyn ExecutableCommand>>;
}

/// A command that already failed before it could run.
///
/// Executing it only prints the diagnostic and reports the status.
pub(crate) struct Diagnosed {
    command: String,
    message: String,
    status: ExitCode,
}

impl Diagnosed {
    pub(crate) fn new(command: impl Into<String>, message: impl Display, status: ExitCode) -> Self {
        Self {
            command: command.into(),
            message: message.to_string(),
            status,
        }
    }
}

impl ExecutableCommand for Diagnosed {
    fn execute(self: Box<Self>, streams: &mut Streams, env: &Environment) -> Result<Outcome> {
        streams.diagnose(env, &self.command, &self.message)?;
        Ok(Outcome::Continue(self.status))
    }
}
