// Claude Desktop config document: typed server entry plus the load, merge
// and save helpers. The document itself stays an untyped JSON object so
// keys this tool does not manage survive the round trip untouched.

use crate::error::SetupError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Top-level key holding the server name -> entry mapping.
pub const MCP_SERVERS_KEY: &str = "mcpServers";
/// Name under which the Snyk server is registered.
pub const SERVER_NAME: &str = "snyk";

/// Minimum severity of findings the Snyk server reports.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    /// Exact, case-sensitive match against the four level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// Environment passed to the launched server process.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServerEnv {
    #[serde(rename = "SNYK_TOKEN")]
    pub token: String,
    #[serde(rename = "SNYK_ORG", skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(
        rename = "SNYK_SEVERITY_THRESHOLD",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity_threshold: Option<Severity>,
}

/// How Claude Desktop launches an MCP server.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
    pub env: ServerEnv,
}

impl ServerEntry {
    /// Entry running `snyk mcp -t stdio`. An empty organization id is
    /// left out of the environment.
    pub fn snyk(token: &str, org: Option<&str>, severity_threshold: Option<Severity>) -> Self {
        ServerEntry {
            command: "snyk".into(),
            args: vec!["mcp".into(), "-t".into(), "stdio".into()],
            env: ServerEnv {
                token: token.to_string(),
                org: org.filter(|o| !o.is_empty()).map(str::to_string),
                severity_threshold,
            },
        }
    }
}

/// Result of reading the config file. `warning` is set when an existing
/// file could not be used and the document was reset to an empty object.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub document: Map<String, Value>,
    pub warning: Option<String>,
}

/// Read the config at `path`. A missing file yields an empty document;
/// an unreadable or malformed one yields an empty document plus a warning.
/// The file on disk is never touched here.
pub fn load_config(path: &Path) -> LoadedConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no existing config, starting empty");
            return LoadedConfig::default();
        }
        Err(e) => return discarded(path, e.to_string()),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(document)) => {
            debug!(path = %path.display(), keys = document.len(), "loaded existing config");
            LoadedConfig { document, warning: None }
        }
        Ok(_) => discarded(path, "expected a JSON object at the top level".into()),
        Err(e) => discarded(path, e.to_string()),
    }
}

fn discarded(path: &Path, reason: String) -> LoadedConfig {
    warn!(path = %path.display(), %reason, "ignoring existing config");
    LoadedConfig {
        document: Map::new(),
        warning: Some(reason),
    }
}

/// Whether `document` already registers a server called `name`.
pub fn has_server(document: &Map<String, Value>, name: &str) -> bool {
    document
        .get(MCP_SERVERS_KEY)
        .and_then(Value::as_object)
        .map_or(false, |servers| servers.contains_key(name))
}

/// Insert or replace `name` under `mcpServers`, creating the mapping when
/// it is missing. Every other key is left as it was.
pub fn merge_server(
    document: &mut Map<String, Value>,
    name: &str,
    entry: &ServerEntry,
) -> Result<(), SetupError> {
    let value = serde_json::to_value(entry)?;
    let servers = document
        .entry(MCP_SERVERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !servers.is_object() {
        warn!("existing {} is not an object, replacing it", MCP_SERVERS_KEY);
        *servers = Value::Object(Map::new());
    }
    if let Value::Object(servers) = servers {
        servers.insert(name.to_string(), value);
    }
    debug!(server = name, "merged server entry");
    Ok(())
}

/// Write `document` as 2-space indented JSON, creating parent directories.
/// The previous file content is replaced entirely.
pub fn save_config(path: &Path, document: &Map<String, Value>) -> Result<(), SetupError> {
    let save_err = |source: io::Error| SetupError::Save {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(save_err)?;
    }
    let text = serde_json::to_string_pretty(document)
        .map_err(|e| save_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    fs::write(path, text).map_err(save_err)?;
    debug!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn severity_parses_only_known_levels() {
        assert_eq!("low".parse::<Severity>(), Ok(Severity::Low));
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert!("urgent".parse::<Severity>().is_err());
        assert!("HIGH".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn snyk_entry_serializes_expected_shape() {
        let entry = ServerEntry::snyk("xyz", Some("org1"), Some(Severity::High));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "command": "snyk",
                "args": ["mcp", "-t", "stdio"],
                "env": {
                    "SNYK_TOKEN": "xyz",
                    "SNYK_ORG": "org1",
                    "SNYK_SEVERITY_THRESHOLD": "high"
                }
            })
        );
    }

    #[test]
    fn optional_env_keys_are_omitted() {
        let entry = ServerEntry::snyk("abc123", Some(""), None);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["env"], json!({ "SNYK_TOKEN": "abc123" }));
    }

    #[test]
    fn missing_file_loads_empty_without_warning() {
        let dir = TempDir::new().unwrap();
        let loaded = load_config(&dir.path().join("absent.json"));
        assert!(loaded.document.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn invalid_json_loads_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = load_config(&path);
        assert!(loaded.document.is_empty());
        assert!(loaded.warning.is_some());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_object_root_loads_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let loaded = load_config(&path);
        assert!(loaded.document.is_empty());
        assert!(loaded.warning.unwrap().contains("object"));
    }

    #[test]
    fn directory_in_place_of_file_warns() {
        let dir = TempDir::new().unwrap();
        let loaded = load_config(dir.path());
        assert!(loaded.document.is_empty());
        assert!(loaded.warning.is_some());
    }

    #[test]
    fn merge_creates_container_and_keeps_other_keys() {
        let mut doc = object(json!({ "theme": "dark", "globalShortcut": "Ctrl+Space" }));
        merge_server(&mut doc, SERVER_NAME, &ServerEntry::snyk("t0k3n", None, None)).unwrap();

        assert_eq!(doc["theme"], json!("dark"));
        assert_eq!(doc["globalShortcut"], json!("Ctrl+Space"));
        assert_eq!(doc[MCP_SERVERS_KEY]["snyk"]["command"], json!("snyk"));
        assert!(has_server(&doc, SERVER_NAME));
    }

    #[test]
    fn merge_replaces_existing_entry_and_keeps_siblings() {
        let mut doc = object(json!({
            "mcpServers": {
                "filesystem": { "command": "npx", "args": ["-y", "server-filesystem"] },
                "snyk": { "command": "old" }
            }
        }));
        merge_server(&mut doc, SERVER_NAME, &ServerEntry::snyk("new", None, Some(Severity::Low)))
            .unwrap();

        let servers = doc[MCP_SERVERS_KEY].as_object().unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers["filesystem"]["command"], json!("npx"));
        assert_eq!(servers["snyk"]["env"]["SNYK_TOKEN"], json!("new"));
        assert_eq!(servers["snyk"]["env"]["SNYK_SEVERITY_THRESHOLD"], json!("low"));
    }

    #[test]
    fn merge_replaces_non_object_container() {
        let mut doc = object(json!({ "mcpServers": "broken" }));
        merge_server(&mut doc, SERVER_NAME, &ServerEntry::snyk("t", None, None)).unwrap();
        assert!(doc[MCP_SERVERS_KEY].is_object());
        assert!(has_server(&doc, SERVER_NAME));
    }

    #[test]
    fn has_server_handles_missing_or_odd_containers() {
        assert!(!has_server(&Map::new(), SERVER_NAME));
        assert!(!has_server(&object(json!({ "mcpServers": [] })), SERVER_NAME));
        assert!(!has_server(&object(json!({ "mcpServers": { "other": {} } })), SERVER_NAME));
    }

    #[test]
    fn save_creates_parents_and_indents_two_spaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Claude").join("config.json");
        let doc = object(json!({ "a": { "b": 1 } }));

        save_config(&path, &doc).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn save_preserves_key_order_of_loaded_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"zeta": 1, "alpha": {"y": true, "x": null}}"#).unwrap();

        let mut loaded = load_config(&path);
        merge_server(&mut loaded.document, SERVER_NAME, &ServerEntry::snyk("t", None, None))
            .unwrap();
        save_config(&path, &loaded.document).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        let x = text.find("\"x\"").unwrap();
        let servers = text.find("\"mcpServers\"").unwrap();
        assert!(zeta < alpha && alpha < servers);
        assert!(y < x);
    }

    #[test]
    fn numbers_in_untouched_keys_keep_their_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"id": 12345678901234567890123, "r": 1e400, "f": 0.1}"#).unwrap();

        let mut loaded = load_config(&path);
        assert!(loaded.warning.is_none());
        merge_server(&mut loaded.document, SERVER_NAME, &ServerEntry::snyk("t", None, None))
            .unwrap();
        save_config(&path, &loaded.document).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"id\": 12345678901234567890123"), "{text}");
        assert!(text.contains("\"r\": 1e400"), "{text}");
        assert!(text.contains("\"f\": 0.1"), "{text}");
        assert!(text.contains("\"mcpServers\""));
    }

    #[test]
    fn save_reports_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = save_config(&blocker.join("config.json"), &Map::new()).unwrap_err();
        assert!(matches!(err, SetupError::Save { .. }));
    }
}
