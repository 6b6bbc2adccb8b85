use crate::command::{CommandFactory, Diagnosed, ExecutableCommand, ExitCode, Outcome, Streams, status};
use crate::env::Environment;
use crate::error::BuiltinError;
use crate::interpreter::Factory;
use crate::lexer::ArgumentVector;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit" or "env".
    fn name() -> &'static str;

    /// Executes the command using the shell's output streams and environment.
    fn execute(self, streams: &mut Streams, env: &Environment) -> Result<Outcome>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, streams: &mut Streams, env: &Environment) -> Result<Outcome> {
        match <T as BuiltinCommand>::execute(*self, streams, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                streams.diagnose(env, T::name(), e)?;
                Ok(Outcome::Continue(status::FAILURE))
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        argv: &ArgumentVector,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let name = argv.command()?;
        if name != T::name() {
            return None;
        }
        debug!(builtin = name, "dispatching builtin");
        // Everything after `--` is positional, so `exit -1` reaches the builtin.
        let mut args = vec!["--"];
        args.extend(argv.args().iter().map(String::as_str));
        let cmd: Box<dyn ExecutableCommand> = match T::from_args(&[name], &args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, .. }) => {
                Box::new(Diagnosed::new(name, output.trim_end(), status::FAILURE))
            }
        };
        Some(cmd)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// exit status, decimal digits only; anything after the first value is ignored.
    pub args: Vec<String>,
}

impl Exit {
    /// The requested exit code, reduced to the 0-255 range a process can report.
    fn code(&self) -> Result<ExitCode, BuiltinError> {
        let Some(arg) = self.args.first() else {
            return Ok(status::SUCCESS);
        };
        if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BuiltinError::IllegalNumber(arg.clone()));
        }
        Ok(arg
            .bytes()
            .fold(0, |acc, d| (acc * 10 + ExitCode::from(d - b'0')) % 256))
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, streams: &mut Streams, env: &Environment) -> Result<Outcome> {
        match self.code() {
            Ok(code) => Ok(Outcome::Terminate(code)),
            Err(err) => {
                streams.diagnose(env, Self::name(), &err)?;
                Ok(Outcome::Terminate(err.status()))
            }
        }
    }
}

#[derive(FromArgs)]
/// Print the environment, one `NAME=value` entry per line, in storage order.
pub struct Env {
    #[argh(positional, greedy)]
    /// ignored.
    args: Vec<String>,
}

impl BuiltinCommand for Env {
    fn name() -> &'static str {
        "env"
    }

    fn execute(self, streams: &mut Streams, env: &Environment) -> Result<Outcome> {
        if !self.args.is_empty() {
            debug!(ignored = self.args.len(), "env arguments ignored");
        }
        let out = &mut streams.stdout;
        for (key, value) in env.vars() {
            out.write_all(key.as_bytes())?;
            out.write_all(b"=")?;
            out.write_all(value.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(Outcome::Continue(status::SUCCESS))
    }
}
