use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use exprof_config::YamlSettingsStore;
use exprof_reconcile::HostState;

/// Host backed by plain files: a newline-separated list of enabled extension
/// ids, and the settings store's workspace layers for setting scope.
pub struct FileHost<'a> {
    enabled: BTreeSet<String>,
    store: &'a YamlSettingsStore,
}

impl<'a> FileHost<'a> {
    /// A missing list means nothing is enabled. Blank lines and `#` comments
    /// are ignored.
    pub fn load(enabled_path: &Path, store: &'a YamlSettingsStore) -> Result<Self> {
        let raw = match fs::read_to_string(enabled_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("read enabled extensions: {}", enabled_path.display())
                })
            }
        };
        Ok(Self {
            enabled: parse_enabled(&raw),
            store,
        })
    }
}

fn parse_enabled(raw: &str) -> BTreeSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

impl HostState for FileHost<'_> {
    fn is_enabled(&self, extension_id: &str) -> bool {
        // Extension ids are case-insensitive in the host.
        self.enabled.contains(extension_id)
            || self
                .enabled
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension_id))
    }

    fn is_set_at_workspace_scope(&self, key: &str) -> bool {
        self.store.is_set_at_workspace_scope(key)
    }
}
