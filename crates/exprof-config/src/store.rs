use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{load_layered_yaml_from_strings, parse_yaml_doc, LoadedSettings, ProfilesConfig, SECTION};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failures of the persisted settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A settings layer could not be read.
    Read(String),
    /// A settings layer is not valid YAML or has a malformed profile section.
    Parse(String),
    /// The active-profile list could not be written back.
    Write(String),
}

impl StoreError {
    /// Underlying message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            StoreError::Read(m) | StoreError::Parse(m) | StoreError::Write(m) => m,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read(msg) => write!(f, "settings read error: {msg}"),
            StoreError::Parse(msg) => write!(f, "settings parse error: {msg}"),
            StoreError::Write(msg) => write!(f, "settings write error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Persisted settings owned by the host.
///
/// `load` must return [`ProfilesConfig::default`] when nothing is configured.
/// `update_active_profiles` writes the whole list at workspace scope in a
/// single attempt.
pub trait ConfigStore {
    fn load(&self) -> Result<ProfilesConfig, StoreError>;

    fn update_active_profiles(&self, active: &[String]) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// YAML file store
// ---------------------------------------------------------------------------

/// File-backed store: an optional user layer, a workspace layer, and zero or
/// more workspace-folder layers. Missing files are empty layers.
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    user: Option<PathBuf>,
    workspace: PathBuf,
    folders: Vec<PathBuf>,
}

impl YamlSettingsStore {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            user: None,
            workspace: workspace.into(),
            folders: Vec::new(),
        }
    }

    pub fn with_user(mut self, user: impl Into<PathBuf>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_folders<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.folders = folders.into_iter().map(Into::into).collect();
        self
    }

    pub fn workspace_path(&self) -> &Path {
        &self.workspace
    }

    /// Merge user then workspace layers.
    pub fn load_settings(&self) -> Result<LoadedSettings, StoreError> {
        let mut docs: Vec<String> = Vec::new();
        if let Some(user) = &self.user {
            docs.push(read_layer(user)?);
        }
        docs.push(read_layer(&self.workspace)?);

        let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
        load_layered_yaml_from_strings(&doc_refs).map_err(|e| StoreError::Parse(format!("{e:#}")))
    }

    /// True when `key` is set in the workspace layer, or in every folder layer
    /// when there is at least one folder.
    pub fn is_set_at_workspace_scope(&self, key: &str) -> bool {
        match self.layer_has(&self.workspace, key) {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                warn!(key, error = %e, "workspace settings unreadable, treating setting as unset");
                return false;
            }
        }

        if self.folders.is_empty() {
            return false;
        }
        self.folders.iter().all(|folder| match self.layer_has(folder, key) {
            Ok(set) => set,
            Err(e) => {
                warn!(key, folder = %folder.display(), error = %e, "folder settings unreadable");
                false
            }
        })
    }

    fn layer_has(&self, path: &Path, key: &str) -> Result<bool, StoreError> {
        let raw = read_layer(path)?;
        let root = parse_yaml_doc(&raw).map_err(|e| StoreError::Parse(format!("{e:#}")))?;
        Ok(has_setting(&root, key))
    }
}

impl ConfigStore for YamlSettingsStore {
    fn load(&self) -> Result<ProfilesConfig, StoreError> {
        self.load_settings().map(|loaded| loaded.profiles)
    }

    fn update_active_profiles(&self, active: &[String]) -> Result<(), StoreError> {
        let raw = read_layer(&self.workspace).map_err(|e| StoreError::Write(e.to_string()))?;
        let mut root = parse_yaml_doc(&raw).map_err(|e| StoreError::Write(format!("{e:#}")))?;

        let Some(obj) = root.as_object_mut() else {
            return Err(StoreError::Write(format!(
                "workspace settings root is not a mapping: {}",
                self.workspace.display()
            )));
        };

        obj.remove(&format!("{SECTION}.activeProfiles"));
        let section = obj
            .entry(SECTION.to_string())
            .or_insert_with(|| serde_json::json!({}));
        if !section.is_object() {
            *section = serde_json::json!({});
        }
        if let Some(section) = section.as_object_mut() {
            section.insert(
                "activeProfiles".to_string(),
                Value::Array(active.iter().cloned().map(Value::String).collect()),
            );
        }

        let out = serde_yaml::to_string(&root).map_err(|e| StoreError::Write(e.to_string()))?;
        fs::write(&self.workspace, out).map_err(|e| {
            StoreError::Write(format!("{}: {e}", self.workspace.display()))
        })?;
        debug!(path = %self.workspace.display(), count = active.len(), "active profiles written");
        Ok(())
    }
}

fn read_layer(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StoreError::Read(format!("{}: {e}", path.display()))),
    }
}

/// True if `key` has a non-null value in `root`, either as a flat dotted key
/// (`editor.tabSize: 2`) or as a nested path (`editor: { tabSize: 2 }`).
pub fn has_setting(root: &Value, key: &str) -> bool {
    if root.get(key).map(|v| !v.is_null()).unwrap_or(false) {
        return true;
    }
    let mut cur = root;
    for part in key.split('.') {
        match cur.get(part) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    !cur.is_null()
}
