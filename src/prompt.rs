// Prompting capability used by the setup flow. `TerminalPrompter` drives a
// real terminal through `dialoguer`; `LinePrompter` reads plain lines from
// any reader, which covers piped stdin and scripted tests.

use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// Ask the user for one line of text given a label.
pub trait Prompter {
    fn ask(&mut self, label: &str) -> io::Result<String>;
}

/// Interactive prompter backed by `dialoguer::Input`.
///
/// Ctrl-C while a prompt is active surfaces as `io::ErrorKind::Interrupted`.
#[derive(Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    }
}

/// Prompter that writes the label to `output` and reads one line from `input`.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Line prompter over the process stdin and stdout.
    pub fn stdio() -> Self {
        LinePrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no input for '{}'", label),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
