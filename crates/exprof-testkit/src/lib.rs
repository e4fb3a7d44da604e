//! In-memory host and store doubles for exercising the profile engine.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use anyhow::{Context, Result};
use exprof_config::{load_layered_yaml_from_strings, ConfigStore, ProfilesConfig, StoreError};
use exprof_reconcile::HostState;

/// Parse a YAML settings document into a profile config.
pub fn config_from_yaml(yaml: &str) -> Result<ProfilesConfig> {
    let loaded = load_layered_yaml_from_strings(&[yaml]).context("parse test settings")?;
    Ok(loaded.profiles)
}

/// Host double: a fixed set of enabled add-ons and workspace-scoped settings.
/// Counts every query it answers.
#[derive(Debug, Default)]
pub struct StubHost {
    enabled: BTreeSet<String>,
    workspace_settings: BTreeSet<String>,
    queries: Cell<usize>,
}

impl StubHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_workspace_settings<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workspace_settings.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Number of host queries answered so far.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl HostState for StubHost {
    fn is_enabled(&self, extension_id: &str) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.enabled.contains(extension_id)
    }

    fn is_set_at_workspace_scope(&self, key: &str) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.workspace_settings.contains(key)
    }
}

/// Store double. Writes replace the active list of the held config, unless
/// the store is set to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    config: RefCell<ProfilesConfig>,
    writes: RefCell<Vec<Vec<String>>>,
    fail_writes: Option<String>,
    fail_reads: Option<String>,
}

impl MemoryStore {
    pub fn new(config: ProfilesConfig) -> Self {
        Self {
            config: RefCell::new(config),
            ..Self::default()
        }
    }

    pub fn failing_writes(mut self, message: impl Into<String>) -> Self {
        self.fail_writes = Some(message.into());
        self
    }

    pub fn failing_reads(mut self, message: impl Into<String>) -> Self {
        self.fail_reads = Some(message.into());
        self
    }

    /// Snapshot of the currently stored config.
    pub fn config(&self) -> ProfilesConfig {
        self.config.borrow().clone()
    }

    pub fn active_profiles(&self) -> Vec<String> {
        self.config.borrow().active_profiles.clone()
    }

    /// Every list written, in order (including attempts that failed).
    pub fn writes(&self) -> Vec<Vec<String>> {
        self.writes.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<ProfilesConfig, StoreError> {
        match &self.fail_reads {
            Some(msg) => Err(StoreError::Read(msg.clone())),
            None => Ok(self.config()),
        }
    }

    fn update_active_profiles(&self, active: &[String]) -> Result<(), StoreError> {
        self.writes.borrow_mut().push(active.to_vec());
        if let Some(msg) = &self.fail_writes {
            return Err(StoreError::Write(msg.clone()));
        }
        self.config.borrow_mut().active_profiles = active.to_vec();
        Ok(())
    }
}

/// Count signals matching `pred`.
pub fn count<F>(signals: &[exprof_reconcile::Signal], pred: F) -> usize
where
    F: Fn(&exprof_reconcile::Signal) -> bool,
{
    signals.iter().filter(|s| pred(s)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_host_counts_queries() {
        let host = StubHost::new().with_enabled(["a.b"]);
        assert!(host.is_enabled("a.b"));
        assert!(!host.is_set_at_workspace_scope("x"));
        assert_eq!(host.queries(), 2);
    }

    #[test]
    fn failing_store_records_attempt_but_keeps_list() {
        let store = MemoryStore::new(ProfilesConfig::default().with_active(["A"])).failing_writes("ro");
        assert!(store.update_active_profiles(&["B".to_string()]).is_err());
        assert_eq!(store.writes(), vec![vec!["B".to_string()]]);
        assert_eq!(store.active_profiles(), vec!["A".to_string()]);
    }
}
