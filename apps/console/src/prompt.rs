//! Line-oriented prompts over any reader/writer pair.
//!
//! The session talks to a `Console` instead of stdin/stdout directly so
//! menus can be driven by scripted input in tests.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Prompt reader plus output sink.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Consumes the console and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes one line.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Writes a block of text as-is.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    /// Shows `prompt` and reads one trimmed line.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Console::ask`], but running out of input is an error.
    pub fn ask_text(&mut self, prompt: &str) -> AppResult<String> {
        self.ask(prompt)?.ok_or_else(AppError::input_closed)
    }

    /// Asks for a value and parses it; `what` names it in the error.
    pub fn ask_parsed<T: FromStr>(&mut self, prompt: &str, what: &str) -> AppResult<T> {
        let text = self.ask_text(prompt)?;
        text.parse()
            .map_err(|_| AppError::invalid_input(format!("{} must be a number", what)))
    }

    /// Asks for a 1-based position among `count` entries; returns it 0-based.
    pub fn choose_index(&mut self, prompt: &str, count: usize) -> AppResult<usize> {
        let choice: usize = self.ask_parsed(prompt, "Choice")?;
        match choice.checked_sub(1) {
            Some(index) if index < count => Ok(index),
            _ => Err(AppError::invalid_input("Invalid choice")),
        }
    }

    /// Asks for a 1-based position in `options`.
    pub fn choose<T: Copy>(&mut self, prompt: &str, options: &[T]) -> AppResult<T> {
        let index = self.choose_index(prompt, options.len())?;
        Ok(options[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_and_echoes_prompt() {
        let mut c = console("  Latte \n");

        assert_eq!(c.ask("Title: ").unwrap(), Some("Latte".to_string()));
        assert_eq!(c.ask("Again: ").unwrap(), None);
        assert_eq!(String::from_utf8(c.into_output()).unwrap(), "Title: Again: ");
    }

    #[test]
    fn test_ask_parsed() {
        let mut c = console("12\nabc\n");

        assert_eq!(c.ask_parsed::<i64>("> ", "Price").unwrap(), 12);
        let err = c.ask_parsed::<i64>("> ", "Price").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "Price must be a number");
        assert!(c.ask_parsed::<i64>("> ", "Price").unwrap_err().is_input_closed());
    }

    #[test]
    fn test_choose_is_one_based() {
        let mut c = console("2\n0\n4\n");
        let options = ['a', 'b', 'c'];

        assert_eq!(c.choose("> ", &options).unwrap(), 'b');
        assert!(c.choose("> ", &options).is_err());
        assert!(c.choose("> ", &options).is_err());
    }
}
