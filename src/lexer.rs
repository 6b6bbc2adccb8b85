//! Lexical analysis of a command line: whitespace splitting only.
//!
//! No quoting, escaping or expansion is performed; a token is exactly the
//! characters between delimiters.

/// Ordered command words; index 0 is the command name.
///
/// An empty vector means the line was blank and nothing should run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    pub fn new(words: Vec<String>) -> Self {
        debug_assert!(words.iter().all(|w| !w.is_empty()));
        Self(words)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The command name, `None` for a blank line.
    pub fn command(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
}

struct LexingFSM<'a> {
    input: std::str::Chars<'a>,
    state: LexingState,
    buffer: String,
}

impl<'a> LexingFSM<'a> {
    fn new(line: &'a str) -> Self {
        LexingFSM {
            input: line.chars(),
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    /// Runs the machine over the input and returns the collected words.
    ///
    /// The first newline ends the line; anything after it is ignored.
    fn make_tokens(mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.input.next() {
            if ch == '\n' {
                break;
            }
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
            }
        }

        if self.state == LexingState::ReadingWord {
            out.push(std::mem::take(&mut self.buffer));
        }
        out
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => {}
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) {
        match ch {
            ' ' | '\t' => {
                out.push(std::mem::take(&mut self.buffer));
                self.state = LexingState::Start;
            }
            c => self.buffer.push(c),
        }
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Splits `line` on runs of spaces and tabs. Leading and trailing whitespace
/// produce no empty words, and a whitespace-only line yields an empty vector.
pub fn split_into_tokens(line: &str) -> ArgumentVector {
    ArgumentVector::new(LexingFSM::new(line).make_tokens())
}
