use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// Source of user lines for an interactive session.
pub trait TurnInput {
    /// Shows `prompt` and reads one line. `Ok(None)` means end of input.
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads plain lines from any buffered reader, echoing the prompt to `echo`.
pub struct LineInput<R, W> {
    reader: R,
    echo: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, echo: W) -> Self {
        Self { reader, echo }
    }
}

impl<R: BufRead, W: Write> TurnInput for LineInput<R, W> {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.echo, "{prompt}: ")?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Interactive terminal input with line editing.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TurnInput for TerminalInput {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Ok(Some(line)),
            Err(dialoguer::Error::IO(error)) if error.kind() == io::ErrorKind::UnexpectedEof => {
                Ok(None)
            }
            Err(error) => Err(io::Error::other(error)),
        }
    }
}
