//! Console session: who the user is and whether they want to raise an SOS

use std::io::{self, BufRead, Write};

/// Name used when the user enters nothing
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChoice {
    Sos,
    Ok,
}

impl StatusChoice {
    /// `s` (any case, surrounding whitespace ignored) is an SOS; anything else is OK
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("s") {
            Self::Sos
        } else {
            Self::Ok
        }
    }

    pub fn is_sos(&self) -> bool {
        matches!(self, Self::Sos)
    }
}

/// Line-oriented prompts over any reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn ask_name(&mut self) -> io::Result<String> {
        let name = self.prompt("Enter your Name: ")?;
        Ok(if name.is_empty() {
            ANONYMOUS.to_string()
        } else {
            name
        })
    }

    pub fn ask_status(&mut self) -> io::Result<StatusChoice> {
        writeln!(self.output, "\n[Options] Type 's' for SOS, 'o' for OK")?;
        let answer = self.prompt("Status: ")?;
        Ok(StatusChoice::parse(&answer))
    }
}
