// Entrypoint for the setup tool.
// - Keeps `main` small: capture process state, pick a prompter and hand
//   both to the setup flow.
// - Maps failures to exit codes; a declined overwrite still exits 0.

use anyhow::Context;
use snyk_claude_setup::error::SetupError;
use snyk_claude_setup::paths::{HostEnv, Platform};
use snyk_claude_setup::prompt::{LinePrompter, TerminalPrompter};
use snyk_claude_setup::ui::{paint, run_setup, Console, SetupOutcome, Tone};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    // Styling only when stdout is a terminal; piped output stays plain.
    let color = io::stdout().is_terminal();
    let mut out = Console::new(io::stdout(), color);

    // SIGINT outside a dialoguer prompt (piped stdin, between prompts).
    // Inside a prompt the terminal is raw and Ctrl-C arrives as
    // `ErrorKind::Interrupted` instead.
    if let Err(err) = ctrlc::set_handler(move || {
        println!("\n\n{} Setup cancelled by user", paint(Tone::Failure, "x", color));
        std::process::exit(SetupError::Cancelled.exit_code().into());
    }) {
        tracing::warn!(%err, "could not install interrupt handler");
    }

    match run(&mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let mark = out.paint(Tone::Failure, "x");
            match err.downcast_ref::<SetupError>() {
                Some(SetupError::Cancelled) => {
                    println!("\n\n{} Setup cancelled by user", mark);
                    ExitCode::from(SetupError::Cancelled.exit_code())
                }
                Some(setup_err) => {
                    println!("{} {}", mark, setup_err);
                    ExitCode::from(setup_err.exit_code())
                }
                None => {
                    println!("\n{} Unexpected error: {:#}", mark, err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run(out: &mut Console<io::Stdout>) -> anyhow::Result<SetupOutcome> {
    // Process-wide state is read once here and passed down.
    let env = HostEnv::from_process();
    let platform = Platform::current();

    // dialoguer needs a terminal; piped stdin falls back to plain lines.
    let outcome = if io::stdin().is_terminal() {
        run_setup(platform, &env, &mut TerminalPrompter, out)?
    } else {
        run_setup(platform, &env, &mut LinePrompter::stdio(), out)?
    };
    io::Write::flush(out).context("Failed to flush stdout")?;
    Ok(outcome)
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: errors only).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
