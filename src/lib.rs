// Library root
// -----------
// This crate exposes the setup flow as a library. The binary (`main.rs`)
// only captures process state and hands it to `ui::run_setup`.
//
// Module responsibilities:
// - `paths`: Resolves the Claude Desktop config location per OS and
//   captures the environment values the run depends on.
// - `config`: Typed Snyk server entry plus loading, merging and saving
//   the JSON config document.
// - `prompt`: The "ask for a line of text" capability, with a terminal
//   implementation and a plain line-reader implementation.
// - `ui`: Input collection and the linear setup flow.
// - `error`: Failure taxonomy and exit codes.
//
// Keeping prompting and process state behind parameters lets the full
// flow run in tests against scripted input and temporary directories.
pub mod config;
pub mod error;
pub mod paths;
pub mod prompt;
pub mod ui;
