//! Command handlers for the exprof CLI.
//!
//! Shared settings-path resolution lives here; rendering lives in `render`.

pub mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use exprof_config::{report_unused_keys, UnusedKeyPolicy, YamlSettingsStore};
use exprof_reconcile::{
    list_profile_refs, profile_choices, run_startup_check, ProfileAction, ProfileEngine, Signal,
};
use tracing::{info, warn};

use crate::host::FileHost;
use render::print_signals;

pub const ENV_USER_SETTINGS: &str = "EXPROF_USER_SETTINGS";
pub const ENV_WORKSPACE_SETTINGS: &str = "EXPROF_WORKSPACE_SETTINGS";
pub const ENV_ENABLED_EXTENSIONS: &str = "EXPROF_ENABLED_EXTENSIONS";

const DEFAULT_WORKSPACE_SETTINGS: &str = ".vscode/settings.yaml";
const DEFAULT_ENABLED_EXTENSIONS: &str = ".vscode/enabled-extensions.txt";

/// Settings locations after applying flag > environment > default.
#[derive(Debug, Clone)]
pub struct SettingsPaths {
    pub user: Option<PathBuf>,
    pub workspace: PathBuf,
    pub folders: Vec<PathBuf>,
    pub enabled: PathBuf,
}

impl SettingsPaths {
    pub fn resolve(
        user: Option<String>,
        workspace: Option<String>,
        folders: Vec<String>,
        enabled: Option<String>,
    ) -> Self {
        let from_env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            user: user.or_else(|| from_env(ENV_USER_SETTINGS)).map(PathBuf::from),
            workspace: workspace
                .or_else(|| from_env(ENV_WORKSPACE_SETTINGS))
                .unwrap_or_else(|| DEFAULT_WORKSPACE_SETTINGS.to_string())
                .into(),
            folders: folders.into_iter().map(PathBuf::from).collect(),
            enabled: enabled
                .or_else(|| from_env(ENV_ENABLED_EXTENSIONS))
                .unwrap_or_else(|| DEFAULT_ENABLED_EXTENSIONS.to_string())
                .into(),
        }
    }

    pub fn store(&self) -> YamlSettingsStore {
        let store = YamlSettingsStore::new(&self.workspace).with_folders(self.folders.clone());
        match &self.user {
            Some(user) => store.with_user(user),
            None => store,
        }
    }
}

/// One engine invocation the CLI can run.
#[derive(Debug, Clone)]
pub enum ProfileCommand {
    List,
    Choices(String),
    Run(String, ProfileAction),
    Startup { delay: Duration, force: bool },
}

pub async fn run_profile_command(paths: &SettingsPaths, cmd: ProfileCommand) -> Result<()> {
    let store = paths.store();
    let host = FileHost::load(&paths.enabled, &store)?;
    let engine = ProfileEngine::new(&store, &host);

    let signals: Vec<Signal> = match cmd {
        ProfileCommand::List => {
            match engine.setup_menu() {
                Ok(refs) => {
                    for r in refs {
                        println!("{}", r.display_name());
                    }
                    Vec::new()
                }
                Err(signal) => vec![signal],
            }
        }
        ProfileCommand::Choices(name) => {
            let config = store.load_settings().map_err(anyhow::Error::new)?.profiles;
            match list_profile_refs(&config).into_iter().find(|r| r.name == name) {
                Some(r) => {
                    for choice in profile_choices(&r) {
                        println!("{}", choice.label(&r.name));
                    }
                    Vec::new()
                }
                None => vec![Signal::UnknownProfile { profile: name }],
            }
        }
        ProfileCommand::Run(name, ProfileAction::Activate) => engine.activate_profile_by_name(&name),
        ProfileCommand::Run(name, action) => {
            let config = store.load_settings().map_err(anyhow::Error::new)?.profiles;
            engine.reconcile(&name, action, &config).signals
        }
        ProfileCommand::Startup { delay, force } => {
            if force {
                let config = store.load_settings().map_err(anyhow::Error::new)?.profiles;
                tokio::time::sleep(delay).await;
                engine.scan_active_profiles(&config)
            } else {
                run_startup_check(&engine, delay).await
            }
        }
    };

    print_signals(&engine, &signals);
    Ok(())
}

pub fn config_show(paths: &SettingsPaths) -> Result<()> {
    let loaded = paths.store().load_settings().map_err(anyhow::Error::new)?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}

pub fn config_lint(paths: &SettingsPaths, strict: bool) -> Result<()> {
    let loaded = paths.store().load_settings().map_err(anyhow::Error::new)?;
    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(&loaded.section_json, policy)?;
    if report.is_clean() {
        info!("no unknown profile keys");
        println!("clean");
    } else {
        for p in &report.unused_leaf_pointers {
            warn!(pointer = %p, "unknown profile key");
            println!("unused {p}");
        }
    }
    Ok(())
}
