//! User-facing entry points: the setup picker, activation by name, and
//! follow-up dispatch.

use exprof_config::ProfilesConfig;
use tracing::{debug, info};

use crate::batch::split_batch;
use crate::catalog::list_profile_refs;
use crate::{FollowUp, ProfileChoice, ProfileEngine, ProfileRef, Signal, PROFILES_SETTINGS_QUERY};

/// Menu entries for one listed profile.
pub fn profile_choices(profile: &ProfileRef) -> Vec<ProfileChoice> {
    let mut out = Vec::new();
    if profile.exists && !profile.activated {
        out.push(ProfileChoice::Activate);
    }
    if profile.exists {
        out.push(ProfileChoice::View);
    }
    if profile.activated {
        out.push(ProfileChoice::Deactivate);
    }
    out
}

impl ProfileEngine<'_> {
    fn load_config(&self) -> Result<ProfilesConfig, Signal> {
        self.store.load().map_err(|e| Signal::LoadFailed {
            message: e.to_string(),
        })
    }

    /// Profiles for the interactive picker, or the signal to show instead.
    pub fn setup_menu(&self) -> Result<Vec<ProfileRef>, Signal> {
        let config = self.load_config()?;
        let refs = list_profile_refs(&config);
        if refs.is_empty() {
            return Err(Signal::NoProfilesDefined);
        }
        Ok(refs)
    }

    /// Apply a picker choice to the profile it was offered for.
    pub fn choose(&self, profile: &ProfileRef, choice: ProfileChoice) -> Vec<Signal> {
        match self.load_config() {
            Ok(config) => self.reconcile(&profile.name, choice.action(), &config).signals,
            Err(signal) => vec![signal],
        }
    }

    /// Programmatic activation. Already-active and undefined names are
    /// rejected before any state change.
    pub fn activate_profile_by_name(&self, name: &str) -> Vec<Signal> {
        let config = match self.load_config() {
            Ok(c) => c,
            Err(signal) => return vec![signal],
        };

        if config.is_active(name) {
            info!(profile = name, "profile already active");
            return vec![Signal::AlreadyActive {
                profile: name.to_string(),
            }];
        }
        if !config.is_defined(name) {
            return vec![Signal::UnknownProfile {
                profile: name.to_string(),
            }];
        }

        self.reconcile(name, crate::ProfileAction::Activate, &config)
            .signals
    }

    /// Resolve a follow-up the user picked (or one a signal runs immediately).
    pub fn dispatch(&self, follow_up: &FollowUp) -> Vec<Signal> {
        debug!(?follow_up, "dispatching follow-up");
        match follow_up {
            FollowUp::Profile { name, action } => match self.load_config() {
                Ok(config) => self.reconcile(name, *action, &config).signals,
                Err(signal) => vec![signal],
            },
            FollowUp::AcknowledgeTemporary { name } => match self.load_config() {
                Ok(config) => self.reconcile_acknowledged(name, &config).signals,
                Err(signal) => vec![signal],
            },
            FollowUp::ShowExtensions {
                profile,
                disposition,
                query,
            } => {
                let (head, rest) = split_batch(query);
                let mut out = vec![Signal::ExtensionSearch {
                    profile: profile.clone(),
                    disposition: *disposition,
                    query: head.to_string(),
                }];
                if let Some(rest) = rest {
                    out.push(Signal::MoreExtensions {
                        profile: profile.clone(),
                        disposition: *disposition,
                        remaining: rest.to_string(),
                    });
                }
                out
            }
            FollowUp::PreviewSettings { profile, settings } => {
                // A map of JSON values always serializes.
                let document = serde_json::to_string_pretty(settings).unwrap_or_default();
                vec![Signal::SettingsPreview {
                    profile: profile.clone(),
                    document,
                }]
            }
            FollowUp::OpenSettings => vec![Signal::OpenSettings {
                query: PROFILES_SETTINGS_QUERY.to_string(),
            }],
        }
    }
}
