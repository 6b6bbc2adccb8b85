use simple_shell::source::{Piped, Prompt};
use simple_shell::{Environment, Interpreter};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("HSH_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let program = std::env::args_os()
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hsh".to_string());
    let env = Environment::capture(program.clone());
    let interactive = io::stdin().is_terminal();
    debug!(%program, interactive, "starting");

    let mut shell = Interpreter::with_env(env);
    let result = if interactive {
        Prompt::new()
            .map_err(anyhow::Error::from)
            .and_then(|mut source| shell.repl(&mut source))
    } else {
        let mut source = Piped::new(io::stdin().lock());
        shell.repl(&mut source)
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            error!(error = %err, "reading input failed");
            eprintln!("{program}: {err:#}");
            ExitCode::from(2)
        }
    }
}
