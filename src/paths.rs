// Config locator: resolves where Claude Desktop keeps its configuration.
// Process-wide values (home directory, environment variables) are captured
// once in `HostEnv` so the resolution itself stays a pure function.

use std::path::PathBuf;

/// Directory Claude Desktop reserves under the OS application-support location.
pub const VENDOR_DIR: &str = "Claude";
/// File name of the Claude Desktop configuration document.
pub const CONFIG_FILE_NAME: &str = "claude_desktop_config.json";
/// Environment variable consulted for the Snyk token before prompting.
pub const TOKEN_ENV_VAR: &str = "SNYK_TOKEN";

/// Operating system family, as far as config location is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style identifier to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }
}

/// Values read from the process environment at startup.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    pub home: PathBuf,
    pub appdata: Option<String>,
    pub token: Option<String>,
}

impl HostEnv {
    /// Capture the home directory, `APPDATA` and the token variable.
    /// An empty token variable is treated the same as an unset one.
    pub fn from_process() -> Self {
        HostEnv {
            home: dirs::home_dir().unwrap_or_default(),
            appdata: std::env::var("APPDATA").ok(),
            token: std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()),
        }
    }
}

/// Absolute path of the Claude Desktop config file for `platform`.
/// Never fails: missing components resolve to empty path segments.
pub fn config_path(platform: Platform, env: &HostEnv) -> PathBuf {
    let base = match platform {
        Platform::MacOs => env.home.join("Library").join("Application Support"),
        Platform::Windows => PathBuf::from(env.appdata.as_deref().unwrap_or("")),
        Platform::Other => env.home.join(".config"),
    };
    base.join(VENDOR_DIR).join(CONFIG_FILE_NAME)
}
