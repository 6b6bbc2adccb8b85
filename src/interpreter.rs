use crate::command::{CommandFactory, ExitCode, Outcome, Streams, status};
use crate::env::Environment;
use crate::error::ResolveError;
use crate::lexer::{self, ArgumentVector};
use crate::source::LineSource;
use tracing::{debug, trace, warn};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that executes built-in and external commands
/// one line at a time.
///
/// The interpreter holds an [`Environment`] snapshot, the output [`Streams`], and a
/// list of [`CommandFactory`] objects that are queried, in order, to create commands
/// by name. It remembers the status of the last processed line.
///
/// Example
/// ```
/// use simple_shell::{Environment, Interpreter, Outcome};
/// let env = Environment::from_vars("hsh", [("PATH", "/bin:/usr/bin")], "/");
/// let mut sh = Interpreter::with_env(env);
/// assert_eq!(sh.execute_line("exit 3"), Outcome::Terminate(3));
///
/// // Over the current process environment, reporting as `hsh`.
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute_line("exit"), Outcome::Terminate(0));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    streams: Streams,
    status: ExitCode,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>, streams: Streams) -> Self {
        Self {
            env,
            commands,
            streams,
            status: status::SUCCESS,
        }
    }

    /// The default command set (`exit`, `env`, then `PATH` lookup) writing to the
    /// process's standard streams.
    pub fn with_env(env: Environment) -> Self {
        Self::with_streams(env, Streams::inherited())
    }

    /// The default command set writing to the given streams.
    pub fn with_streams(env: Environment, streams: Streams) -> Self {
        use crate::builtin::{Env, Exit};
        use crate::external::ExternalCommand;
        Self::new(
            env,
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Env>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
            streams,
        )
    }

    /// Status of the most recently processed non-blank line.
    pub fn status(&self) -> ExitCode {
        self.status
    }

    /// Tokenize and run one line.
    ///
    /// A blank line leaves the status untouched. Every other line updates it,
    /// including the line that asks to terminate.
    pub fn execute_line(&mut self, line: &str) -> Outcome {
        let argv = lexer::split_into_tokens(line);
        if argv.is_empty() {
            trace!("blank line");
            return Outcome::Continue(self.status);
        }
        let outcome = self.run(&argv);
        self.status = outcome.code();
        outcome
    }

    /// Run a single command invocation.
    ///
    /// The first factory that recognizes the command creates it. Failures while
    /// executing (e.g. a closed output stream) are reported and recorded as status 1.
    pub fn run(&mut self, argv: &ArgumentVector) -> Outcome {
        let Some(name) = argv.command() else {
            return Outcome::Continue(self.status);
        };
        debug!(command = name, args = argv.len() - 1, "executing");

        let Some(cmd) = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, argv))
        else {
            self.report(name, ResolveError::NotFound);
            return Outcome::Continue(ResolveError::NotFound.status());
        };

        match cmd.execute(&mut self.streams, &self.env) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(command = name, error = %err, "command failed");
                self.report(name, format!("{err:#}"));
                Outcome::Continue(status::FAILURE)
            }
        }
    }

    fn report(&mut self, name: &str, message: impl std::fmt::Display) {
        if let Err(e) = self.streams.diagnose(&self.env, name, message) {
            warn!(error = %e, "failed to write diagnostic");
        }
    }

    /// Read-Eval-Print Loop.
    ///
    /// Runs lines until the source is exhausted or a command terminates the shell.
    /// The returned code is the one the process should exit with: the terminating
    /// command's code, otherwise the last status for non-interactive input and 0
    /// for an interactive session.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> anyhow::Result<ExitCode> {
        while let Some(line) = source.next_line()? {
            if let Outcome::Terminate(code) = self.execute_line(&line) {
                debug!(code, "terminating");
                return Ok(code);
            }
        }
        debug!(status = self.status, "end of input");
        if let Err(e) = self.streams.flush() {
            warn!(error = %e, "failed to flush output");
        }
        Ok(if source.is_interactive() {
            status::SUCCESS
        } else {
            self.status
        })
    }
}

impl Default for Interpreter {
    /// Interpreter over the current process environment, named `hsh`.
    fn default() -> Self {
        Self::with_env(Environment::capture("hsh"))
    }
}
