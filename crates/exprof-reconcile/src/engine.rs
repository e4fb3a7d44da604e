use exprof_config::{ConfigStore, ProfileDefinition, ProfilesConfig};
use tracing::{debug, info, warn};

use crate::mutator::set_active;
use crate::{HostState, Presentation, ProfileAction, ProfileDelta, Signal};

/// Result of one [`ProfileEngine::reconcile`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconcileOutcome {
    /// `None` when no host inspection happened (Deactivate, undefined
    /// profile, temporary profile at startup).
    pub delta: Option<ProfileDelta>,
    /// Effects in presentation order.
    pub signals: Vec<Signal>,
}

impl ReconcileOutcome {
    fn signals_only(signals: Vec<Signal>) -> Self {
        Self {
            delta: None,
            signals,
        }
    }
}

/// Compute what `def` still needs for `action`.
///
/// View reports everything unfiltered. Activate and Startup keep only the
/// entries whose live state differs. Deactivate needs nothing.
pub fn compute_delta(
    profile: &str,
    def: &ProfileDefinition,
    action: ProfileAction,
    host: &dyn HostState,
) -> ProfileDelta {
    match action {
        ProfileAction::Deactivate => ProfileDelta::empty(profile),
        ProfileAction::View => ProfileDelta {
            profile: profile.to_string(),
            needs_enable: def.extensions.clone(),
            needs_settings: def.settings.clone(),
            needs_disable: def.disabled_extensions.clone(),
        },
        ProfileAction::Activate | ProfileAction::Startup => ProfileDelta {
            profile: profile.to_string(),
            needs_enable: def
                .extensions
                .iter()
                .filter(|id| !host.is_enabled(id))
                .cloned()
                .collect(),
            needs_settings: def
                .settings
                .iter()
                .filter(|(key, _)| !host.is_set_at_workspace_scope(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            needs_disable: def
                .disabled_extensions
                .iter()
                .filter(|id| host.is_enabled(id))
                .cloned()
                .collect(),
        },
    }
}

/// Reconciliation entry point bound to one host.
///
/// Every operation reads the configuration snapshot it is handed (or loads a
/// fresh one) and never caches it.
pub struct ProfileEngine<'a> {
    pub(crate) store: &'a dyn ConfigStore,
    pub(crate) host: &'a dyn HostState,
}

impl<'a> ProfileEngine<'a> {
    pub fn new(store: &'a dyn ConfigStore, host: &'a dyn HostState) -> Self {
        Self { store, host }
    }

    /// Run `action` for `profile` against `config`.
    ///
    /// 1. Activate/Deactivate write the active list first, unconditionally.
    /// 2. Deactivate stops there.
    /// 3. Undefined profiles yield a single not-defined signal.
    /// 4. Startup of a temporary profile yields a warning instead.
    /// 5. Otherwise emit enable, settings, disable needs in that order; an
    ///    Activate with nothing to enable or disable reports completion.
    ///
    /// A failed write is reported as [`Signal::SaveFailed`]; reconciliation
    /// still runs against the list in `config`.
    pub fn reconcile(
        &self,
        profile: &str,
        action: ProfileAction,
        config: &ProfilesConfig,
    ) -> ReconcileOutcome {
        self.run(profile, action, config, false)
    }

    /// Startup reconciliation of a temporary profile whose warning the user
    /// dismissed.
    pub fn reconcile_acknowledged(&self, profile: &str, config: &ProfilesConfig) -> ReconcileOutcome {
        self.run(profile, ProfileAction::Startup, config, true)
    }

    fn run(
        &self,
        profile: &str,
        action: ProfileAction,
        config: &ProfilesConfig,
        temporary_acknowledged: bool,
    ) -> ReconcileOutcome {
        let mut signals: Vec<Signal> = Vec::new();

        if action.mutates_active_list() {
            let add = action == ProfileAction::Activate;
            match set_active(self.store, &config.active_profiles, profile, add) {
                Ok(_) => info!(profile, ?action, "active profile list changed"),
                Err(e) => {
                    warn!(profile, ?action, error = %e, "cannot save active profiles");
                    signals.push(Signal::SaveFailed {
                        message: e.message().to_string(),
                    });
                }
            }
        }

        if action == ProfileAction::Deactivate {
            signals.push(Signal::Completed {
                profile: profile.to_string(),
                message: format!("Profile '{profile}' deactivated"),
                offer_view: config.is_defined(profile),
            });
            return ReconcileOutcome::signals_only(signals);
        }

        let Some(def) = config.profile(profile) else {
            warn!(profile, ?action, "profile is not defined");
            signals.push(Signal::ProfileNotDefined {
                profile: profile.to_string(),
            });
            return ReconcileOutcome::signals_only(signals);
        };

        if action == ProfileAction::Startup && def.temporary_profile && !temporary_acknowledged {
            signals.push(Signal::TemporaryProfileActive {
                profile: profile.to_string(),
            });
            return ReconcileOutcome::signals_only(signals);
        }

        let delta = compute_delta(profile, def, action, self.host);
        debug!(
            profile,
            ?action,
            enable = delta.needs_enable.len(),
            settings = delta.needs_settings.len(),
            disable = delta.needs_disable.len(),
            "profile delta computed"
        );

        if !delta.needs_enable.is_empty() {
            let presentation = if action == ProfileAction::Startup {
                Presentation::Notification
            } else {
                Presentation::Search
            };
            signals.push(Signal::NeedsEnable {
                profile: profile.to_string(),
                extensions: delta.needs_enable.clone(),
                presentation,
            });
        }
        if !delta.needs_settings.is_empty() {
            signals.push(Signal::NeedsSettings {
                profile: profile.to_string(),
                settings: delta.needs_settings.clone(),
            });
        }
        if !delta.needs_disable.is_empty() {
            signals.push(Signal::NeedsDisable {
                profile: profile.to_string(),
                extensions: delta.needs_disable.clone(),
            });
        }

        // Settings-only deltas deliberately do not count here.
        if action == ProfileAction::Activate
            && delta.needs_enable.is_empty()
            && delta.needs_disable.is_empty()
        {
            signals.push(Signal::Completed {
                profile: profile.to_string(),
                message: format!(
                    "Profile '{profile}' activated - no extensions need to be enabled or disabled"
                ),
                offer_view: true,
            });
        }

        ReconcileOutcome {
            delta: Some(delta),
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    struct Enabled(BTreeSet<&'static str>);

    impl HostState for Enabled {
        fn is_enabled(&self, extension_id: &str) -> bool {
            self.0.contains(extension_id)
        }

        fn is_set_at_workspace_scope(&self, key: &str) -> bool {
            key == "editor.tabSize"
        }
    }

    fn def() -> ProfileDefinition {
        let mut d = ProfileDefinition::with_extensions(["on.ext", "off.ext"]);
        d.disabled_extensions = vec!["on.bad".to_string(), "off.bad".to_string()];
        d.settings.insert("editor.tabSize".to_string(), serde_json::json!(2));
        d.settings.insert("files.eol".to_string(), serde_json::json!("\n"));
        d
    }

    fn host() -> Enabled {
        Enabled(["on.ext", "on.bad"].into_iter().collect())
    }

    #[test]
    fn activate_delta_filters_against_live_state() {
        let d = compute_delta("P", &def(), ProfileAction::Activate, &host());
        assert_eq!(d.needs_enable, vec!["off.ext".to_string()]);
        assert_eq!(d.needs_disable, vec!["on.bad".to_string()]);
        assert_eq!(
            d.needs_settings.keys().collect::<Vec<_>>(),
            vec!["files.eol"]
        );
    }

    #[test]
    fn view_delta_is_unfiltered() {
        let d = compute_delta("P", &def(), ProfileAction::View, &host());
        assert_eq!(d.needs_enable.len(), 2);
        assert_eq!(d.needs_disable.len(), 2);
        assert_eq!(d.needs_settings.len(), 2);
    }

    #[test]
    fn startup_delta_matches_activate_delta() {
        assert_eq!(
            compute_delta("P", &def(), ProfileAction::Startup, &host()),
            compute_delta("P", &def(), ProfileAction::Activate, &host())
        );
    }

    #[test]
    fn deactivate_delta_is_empty() {
        assert!(compute_delta("P", &def(), ProfileAction::Deactivate, &host()).is_clean());
    }
}
