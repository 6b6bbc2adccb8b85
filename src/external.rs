use crate::command::{
    CommandFactory, Diagnosed, ExecutableCommand, ExitCode, OutputStream, Outcome, Streams,
};
use crate::env::Environment;
use crate::error::LaunchError;
use crate::interpreter::Factory;
use crate::lexer::ArgumentVector;
use crate::path::find_command_path;
use anyhow::Result;
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::{debug, warn};

/// Command that is not a builtin.
pub struct ExternalCommand {
    path: PathBuf,
    argv: ArgumentVector,
}

impl ExternalCommand {
    pub fn new(path: PathBuf, argv: ArgumentVector) -> Self {
        Self { path, argv }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    /// Matches every name; unresolvable ones become a diagnosed command.
    fn try_create(
        &self,
        env: &Environment,
        argv: &ArgumentVector,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let name = argv.command()?;
        match find_command_path(env, name) {
            Ok(path) => {
                debug!(command = name, path = %path.display(), "resolved");
                Some(Box::new(ExternalCommand::new(path, argv.clone())))
            }
            Err(err) => {
                debug!(command = name, %err, "resolution failed");
                Some(Box::new(Diagnosed::new(name, err, err.status())))
            }
        }
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, streams: &mut Streams, env: &Environment) -> Result<Outcome> {
        let code = match launch(&self.path, &self.argv, streams, env) {
            Ok(code) => code,
            Err(err) => {
                let name = self.argv.command().unwrap_or_default();
                streams.diagnose(env, name, &err)?;
                err.status()
            }
        };
        Ok(Outcome::Continue(code))
    }
}

fn child_stdio(stream: &dyn OutputStream) -> Stdio {
    if stream.is_inherited() {
        Stdio::inherit()
    } else {
        Stdio::piped()
    }
}

/// Run `path` with `argv` and block until it exits.
///
/// The child sees `argv[0]` exactly as typed, the snapshot's variables and
/// working directory, and the shell's standard input. Output goes straight to
/// inherited streams; anything else is captured and copied over after exit.
pub fn launch(
    path: &Path,
    argv: &ArgumentVector,
    streams: &mut Streams,
    env: &Environment,
) -> Result<ExitCode, LaunchError> {
    let Some(name) = argv.command() else {
        return Ok(crate::command::status::SUCCESS);
    };
    if let Err(e) = streams.flush() {
        warn!(error = %e, "failed to flush shell output before spawn");
    }

    let child = std::process::Command::new(path)
        .arg0(name)
        .args(argv.args())
        .env_clear()
        .envs(env.vars())
        .current_dir(env.current_dir())
        .stdin(Stdio::inherit())
        .stdout(child_stdio(&*streams.stdout))
        .stderr(child_stdio(&*streams.stderr))
        .spawn()
        .map_err(LaunchError::from_spawn)?;
    debug!(pid = child.id(), path = %path.display(), "spawned");

    let output = child.wait_with_output().map_err(LaunchError::Wait)?;
    copy_captured(&mut *streams.stdout, &output.stdout);
    copy_captured(&mut *streams.stderr, &output.stderr);

    let code = exit_code(output.status);
    debug!(code, "child exited");
    Ok(code)
}

fn copy_captured(stream: &mut dyn OutputStream, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if let Err(e) = stream.write_all(bytes).and_then(|()| stream.flush()) {
        warn!(error = %e, "failed to forward child output");
    }
}

fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        1
    }
}
