// UI layer: the linear setup flow (locate, load, collect, merge, confirm,
// write, summarize). Prompts go through a `Prompter` and status lines go
// to a `Console`, so the whole flow can run against scripted input.

use crate::config::{self, ServerEntry, Severity, SERVER_NAME};
use crate::error::SetupError;
use crate::paths::{self, HostEnv, Platform};
use crate::prompt::Prompter;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

const TOKEN_HELP_URL: &str = "https://app.snyk.io/account";

/// Kind of status line, mapped to a terminal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Warning,
    Success,
    Failure,
}

/// `text` styled for `tone`, or unchanged when `color` is off.
pub fn paint(tone: Tone, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Heading => text.bold().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Success => text.green().to_string(),
        Tone::Failure => text.red().to_string(),
    }
}

/// Writer for status lines. Styles are only applied when `color` is set,
/// so piped output carries no escape sequences.
pub struct Console<W> {
    out: W,
    color: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Console { out, color }
    }

    pub fn plain(out: W) -> Self {
        Console::new(out, false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        paint(tone, text, self.color)
    }

    fn heading(&mut self, text: &str) -> io::Result<()> {
        let line = self.paint(Tone::Heading, text);
        writeln!(self.out, "{}", line)
    }
}

impl<W: Write> Write for Console<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Values gathered from the environment and the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupInputs {
    pub token: String,
    /// Empty when the user skipped it.
    pub org_id: String,
    /// Severity as typed, `medium` when left empty. Not validated yet.
    pub severity: String,
}

impl SetupInputs {
    /// Typed threshold, or `None` when the typed value is not a known level.
    pub fn severity_threshold(&self) -> Option<Severity> {
        self.severity.parse().ok()
    }

    pub fn server_entry(&self) -> ServerEntry {
        ServerEntry::snyk(&self.token, Some(self.org_id.as_str()), self.severity_threshold())
    }
}

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Saved { path: PathBuf, inputs: SetupInputs },
    /// An entry already existed and the user did not confirm the overwrite.
    Declined,
}

/// Run the whole setup against `env`, writing status lines to `out`.
pub fn run_setup<P: Prompter, W: Write>(
    platform: Platform,
    env: &HostEnv,
    prompter: &mut P,
    out: &mut Console<W>,
) -> Result<SetupOutcome, SetupError> {
    out.heading("Snyk MCP Server Configuration Setup for Claude Desktop")?;
    writeln!(out, "{}", "=".repeat(60))?;

    let path = paths::config_path(platform, env);
    info!(path = %path.display(), ?platform, "resolved config path");
    writeln!(out, "Configuration file: {}", path.display())?;

    let loaded = config::load_config(&path);
    if let Some(reason) = &loaded.warning {
        let label = out.paint(Tone::Warning, "Warning:");
        writeln!(out, "{} Could not read existing config: {}", label, reason)?;
    }
    let mut document = loaded.document;
    let already_configured = config::has_server(&document, SERVER_NAME);

    let inputs = collect_inputs(env.token.as_deref(), prompter, out)?;
    config::merge_server(&mut document, SERVER_NAME, &inputs.server_entry())?;

    if already_configured && !confirm_overwrite(prompter, out)? {
        let line = out.paint(Tone::Failure, "Configuration cancelled");
        writeln!(out, "{}", line)?;
        info!("user declined overwrite, nothing written");
        return Ok(SetupOutcome::Declined);
    }

    config::save_config(&path, &document)?;
    info!(path = %path.display(), "configuration saved");

    writeln!(out)?;
    let line = out.paint(Tone::Success, "Configuration saved successfully!");
    writeln!(out, "{}", line)?;
    writeln!(out, "File: {}", path.display())?;
    print_next_steps(out)?;
    print_summary(&inputs, out)?;

    Ok(SetupOutcome::Saved { path, inputs })
}

/// Gather the token, organization id and severity.
///
/// The token comes from `env_token` when set, otherwise from a prompt.
/// An empty prompted token fails the run with `SetupError::MissingToken`.
pub fn collect_inputs<P: Prompter, W: Write>(
    env_token: Option<&str>,
    prompter: &mut P,
    out: &mut Console<W>,
) -> Result<SetupInputs, SetupError> {
    let token = match env_token.filter(|t| !t.is_empty()) {
        Some(token) => {
            writeln!(out, "Found Snyk token in environment variable")?;
            token.to_string()
        }
        None => {
            writeln!(out)?;
            out.heading("Snyk API Token Required")?;
            writeln!(out, "You can find your token at: {}", TOKEN_HELP_URL)?;
            let token = prompter.ask("Enter your Snyk API token")?.trim().to_string();
            if token.is_empty() {
                return Err(SetupError::MissingToken);
            }
            token
        }
    };

    writeln!(out)?;
    out.heading("Additional Configuration (optional)")?;
    let org_id = prompter
        .ask("Snyk Organization ID (press Enter to skip)")?
        .trim()
        .to_string();
    let severity = prompter
        .ask("Default severity threshold [low/medium/high/critical] (press Enter for 'medium')")?
        .trim()
        .to_string();
    let severity = if severity.is_empty() {
        Severity::default().to_string()
    } else {
        severity
    };

    Ok(SetupInputs {
        token,
        org_id,
        severity,
    })
}

/// Ask before replacing an existing entry. Only a single `y` (any case)
/// counts as yes.
pub fn confirm_overwrite<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut Console<W>,
) -> Result<bool, SetupError> {
    writeln!(out)?;
    let line = out.paint(Tone::Warning, "Snyk MCP server already configured.");
    writeln!(out, "{}", line)?;
    let answer = prompter.ask("Overwrite? [y/N]")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Show only the length and the last four characters of a token.
/// Tokens of four characters or fewer are masked completely.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

fn print_next_steps<W: Write>(out: &mut Console<W>) -> io::Result<()> {
    writeln!(out)?;
    out.heading("Next Steps:")?;
    writeln!(out, "1. Restart Claude Desktop")?;
    writeln!(out, "2. Open a new conversation")?;
    writeln!(out, "3. Look for Snyk tools in the available tools list")?;
    writeln!(out, "4. Test with: 'Can you check if Snyk is properly authenticated?'")
}

fn print_summary<W: Write>(inputs: &SetupInputs, out: &mut Console<W>) -> io::Result<()> {
    writeln!(out)?;
    out.heading("Configuration Summary:")?;
    writeln!(out, "   - Snyk Token: {}", mask_token(&inputs.token))?;
    if !inputs.org_id.is_empty() {
        writeln!(out, "   - Organization: {}", inputs.org_id)?;
    }
    writeln!(out, "   - Severity Threshold: {}", inputs.severity)
}
