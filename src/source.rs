//! Where command lines come from.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;
use tracing::trace;

/// Prompt shown before every interactive line.
pub const PROMPT: &str = "#cisfun$ ";

/// Supplies one command line at a time.
pub trait LineSource {
    /// The next line without its trailing newline, or `None` at end of input.
    fn next_line(&mut self) -> anyhow::Result<Option<String>>;

    /// Whether a person is typing the lines.
    fn is_interactive(&self) -> bool;
}

/// Interactive terminal input with a prompt.
///
/// History is not recorded.
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Prompt {
    fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C discards the current line and shows a fresh prompt.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => {
                println!();
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Lines read from a pipe or file, no prompt.
///
/// The reader buffers ahead of the current line. Children inherit the same
/// standard input, so a child that reads it (`cat`) only sees what the shell
/// has not already buffered; the buffered lines still run as commands.
pub struct Piped<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Piped<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for Piped<R> {
    fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        trace!(%line, "read line");
        Ok(Some(line))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(input: &[u8]) -> Vec<String> {
        let mut source = Piped::new(Cursor::new(input.to_vec()));
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_piped_splits_lines() {
        assert_eq!(drain(b"echo hi\n\nexit 3\n"), vec!["echo hi", "", "exit 3"]);
    }

    #[test]
    fn test_piped_last_line_without_newline() {
        assert_eq!(drain(b"a\nb"), vec!["a", "b"]);
        assert!(drain(b"").is_empty());
    }

    #[test]
    fn test_piped_invalid_utf8_is_replaced() {
        assert_eq!(drain(b"echo \xff\n"), vec!["echo \u{fffd}"]);
    }

    #[test]
    fn test_piped_is_not_interactive() {
        assert!(!Piped::new(Cursor::new(Vec::new())).is_interactive());
    }
}
