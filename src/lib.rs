//! A minimal interactive command interpreter.
//!
//! Each input line is split on whitespace, checked against the builtins (`exit`,
//! `env`), and otherwise resolved to an executable (absolute path, path relative
//! to the working directory, or a `PATH` search) that is run as a child process.
//! The interpreter waits for the child and records its exit status.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`env`] expose traits and types for implementing your own commands and for
//! describing the environment commands run in.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
mod interpreter;
mod io_adapters;
mod lexer;
pub mod path;
pub mod source;

pub use command::{ExitCode, Outcome, Streams};
pub use env::Environment;
pub use interpreter::Interpreter;
pub use io_adapters::MemWriter;
pub use lexer::{ArgumentVector, split_into_tokens};
