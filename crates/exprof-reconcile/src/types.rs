use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// What the caller wants done with a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileAction {
    Activate,
    Deactivate,
    Startup,
    View,
}

impl ProfileAction {
    pub fn mutates_active_list(self) -> bool {
        matches!(self, ProfileAction::Activate | ProfileAction::Deactivate)
    }
}

/// Listing entry for one profile name. Built fresh for every listing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProfileRef {
    pub name: String,
    /// Present in the profile collection.
    pub exists: bool,
    /// Present in the active list.
    pub activated: bool,
}

impl ProfileRef {
    pub fn new(name: impl Into<String>, exists: bool, activated: bool) -> Self {
        Self {
            name: name.into(),
            exists,
            activated,
        }
    }

    pub fn display_name(&self) -> String {
        format!(
            "{}{}{}",
            if self.activated { "(Active) " } else { "" },
            self.name,
            if self.exists { "" } else { " (PROFILE NOT DEFINED)" }
        )
    }
}

/// Entries of the per-profile action menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileChoice {
    Activate,
    View,
    Deactivate,
}

impl ProfileChoice {
    pub fn action(self) -> ProfileAction {
        match self {
            ProfileChoice::Activate => ProfileAction::Activate,
            ProfileChoice::View => ProfileAction::View,
            ProfileChoice::Deactivate => ProfileAction::Deactivate,
        }
    }

    pub fn label(self, profile: &str) -> String {
        match self {
            ProfileChoice::Activate => format!("Activate {profile} profile"),
            ProfileChoice::View => format!("View extensions in {profile} profile"),
            ProfileChoice::Deactivate => format!("Deactivate {profile} profile"),
        }
    }
}

/// Difference between what a profile wants and what the host reports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDelta {
    pub profile: String,
    pub needs_enable: Vec<String>,
    pub needs_settings: BTreeMap<String, Value>,
    pub needs_disable: Vec<String>,
}

impl ProfileDelta {
    pub fn empty(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.needs_enable.is_empty() && self.needs_settings.is_empty() && self.needs_disable.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Enable,
    Disable,
}

impl Disposition {
    pub fn verb(self) -> &'static str {
        match self {
            Disposition::Enable => "enable",
            Disposition::Disable => "disable",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Disposition::Enable => "Enable",
            Disposition::Disable => "Disable",
        }
    }
}

/// How an enable-needed list reaches the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    /// Open the extension search straight away.
    Search,
    /// Always-shown notification; the search opens only on request.
    Notification,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Request a user choice resolves to. Fed back through
/// `ProfileEngine::dispatch`.
#[derive(Clone, Debug, PartialEq)]
pub enum FollowUp {
    Profile {
        name: String,
        action: ProfileAction,
    },
    /// Startup reconciliation of a temporary profile the user let stand.
    AcknowledgeTemporary { name: String },
    /// Space-joined extension ids to search for, split into batches on dispatch.
    ShowExtensions {
        profile: String,
        disposition: Disposition,
        query: String,
    },
    PreviewSettings {
        profile: String,
        settings: BTreeMap<String, Value>,
    },
    OpenSettings,
}

/// A labelled button on a signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub label: String,
    pub follow_up: FollowUp,
}

impl Offer {
    fn new(label: impl Into<String>, follow_up: FollowUp) -> Self {
        Self {
            label: label.into(),
            follow_up,
        }
    }
}

/// Settings query the host opens for "define profile".
pub const PROFILES_SETTINGS_QUERY: &str = "extension-profiles.profiles";

/// One renderable effect produced by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    NeedsEnable {
        profile: String,
        extensions: Vec<String>,
        presentation: Presentation,
    },
    NeedsSettings {
        profile: String,
        settings: BTreeMap<String, Value>,
    },
    NeedsDisable {
        profile: String,
        extensions: Vec<String>,
    },
    Completed {
        profile: String,
        message: String,
        offer_view: bool,
    },
    /// Open the host's extension view filtered to `query`.
    ExtensionSearch {
        profile: String,
        disposition: Disposition,
        query: String,
    },
    /// Batch remainder gated behind a continuation choice.
    MoreExtensions {
        profile: String,
        disposition: Disposition,
        remaining: String,
    },
    SettingsPreview {
        profile: String,
        document: String,
    },
    /// An active profile has no definition.
    ProfileNotDefined { profile: String },
    TemporaryProfileActive { profile: String },
    SaveFailed { message: String },
    LoadFailed { message: String },
    AlreadyActive { profile: String },
    /// Activation by name of an undefined profile.
    UnknownProfile { profile: String },
    NoProfilesDefined,
    OpenSettings { query: String },
}

impl Signal {
    pub fn severity(&self) -> Severity {
        match self {
            Signal::NeedsEnable { .. }
            | Signal::NeedsSettings { .. }
            | Signal::NeedsDisable { .. }
            | Signal::MoreExtensions { .. }
            | Signal::TemporaryProfileActive { .. }
            | Signal::SaveFailed { .. } => Severity::Warning,
            Signal::ProfileNotDefined { .. }
            | Signal::LoadFailed { .. }
            | Signal::UnknownProfile { .. }
            | Signal::NoProfilesDefined => Severity::Error,
            Signal::Completed { .. }
            | Signal::ExtensionSearch { .. }
            | Signal::SettingsPreview { .. }
            | Signal::AlreadyActive { .. }
            | Signal::OpenSettings { .. } => Severity::Info,
        }
    }

    pub fn profile(&self) -> Option<&str> {
        match self {
            Signal::NeedsEnable { profile, .. }
            | Signal::NeedsSettings { profile, .. }
            | Signal::NeedsDisable { profile, .. }
            | Signal::Completed { profile, .. }
            | Signal::ExtensionSearch { profile, .. }
            | Signal::MoreExtensions { profile, .. }
            | Signal::SettingsPreview { profile, .. }
            | Signal::ProfileNotDefined { profile }
            | Signal::TemporaryProfileActive { profile }
            | Signal::AlreadyActive { profile }
            | Signal::UnknownProfile { profile } => Some(profile),
            Signal::SaveFailed { .. }
            | Signal::LoadFailed { .. }
            | Signal::NoProfilesDefined
            | Signal::OpenSettings { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Signal::NeedsEnable { profile, .. } => {
                format!("Profile '{profile}': extensions need to be enabled")
            }
            Signal::NeedsSettings { profile, .. } => {
                format!("Profile '{profile}': settings need to be configured")
            }
            Signal::NeedsDisable { profile, .. } => {
                format!("Profile '{profile}': extensions need to be DISABLED")
            }
            Signal::Completed { message, .. } => message.clone(),
            Signal::ExtensionSearch { query, .. } => query.clone(),
            Signal::MoreExtensions {
                profile,
                disposition,
                ..
            } => format!(
                "Profile '{profile}': More extensions to {}",
                disposition.verb()
            ),
            Signal::SettingsPreview { document, .. } => document.clone(),
            Signal::ProfileNotDefined { profile } => format!("Profile '{profile}' Not Defined"),
            Signal::TemporaryProfileActive { profile } => {
                format!("Temporary profile '{profile}' is still active")
            }
            Signal::SaveFailed { message } => {
                format!("Cannot save active extension profile: {message}")
            }
            Signal::LoadFailed { message } => {
                format!("Cannot read extension profiles: {message}")
            }
            Signal::AlreadyActive { profile } => format!("Profile '{profile}' is already active"),
            Signal::UnknownProfile { profile } => format!("Profile '{profile}' is not defined"),
            Signal::NoProfilesDefined => "No profiles defined!".to_string(),
            Signal::OpenSettings { query } => query.clone(),
        }
    }

    /// Buttons the user may press. Pressing none is a valid outcome.
    pub fn offers(&self) -> Vec<Offer> {
        match self {
            Signal::NeedsEnable {
                profile,
                extensions,
                presentation: Presentation::Notification,
            } => vec![Offer::new(
                "Show Extensions to Enable",
                show_extensions(profile, Disposition::Enable, extensions.join(" ")),
            )],
            Signal::NeedsDisable {
                profile,
                extensions,
            } => vec![Offer::new(
                "Show Extensions to Disable",
                show_extensions(profile, Disposition::Disable, extensions.join(" ")),
            )],
            Signal::NeedsSettings { profile, settings } => vec![Offer::new(
                "Show Settings to Configure",
                FollowUp::PreviewSettings {
                    profile: profile.clone(),
                    settings: settings.clone(),
                },
            )],
            Signal::Completed {
                profile,
                offer_view: true,
                ..
            } => vec![Offer::new(
                "Show Profile Extensions",
                profile_follow_up(profile, ProfileAction::View),
            )],
            Signal::MoreExtensions {
                profile,
                disposition,
                remaining,
            } => vec![Offer::new(
                format!("View Extensions to {}", disposition.title()),
                show_extensions(profile, *disposition, remaining.clone()),
            )],
            Signal::ProfileNotDefined { profile } => vec![
                Offer::new("Define Profile Now", FollowUp::OpenSettings),
                Offer::new(
                    "Deactivate Profile",
                    profile_follow_up(profile, ProfileAction::Deactivate),
                ),
            ],
            Signal::TemporaryProfileActive { profile } => vec![
                Offer::new(
                    "Deactivate Profile",
                    profile_follow_up(profile, ProfileAction::Deactivate),
                ),
                Offer::new("View Profile", profile_follow_up(profile, ProfileAction::View)),
            ],
            Signal::NoProfilesDefined => {
                vec![Offer::new("Define profiles now", FollowUp::OpenSettings)]
            }
            _ => Vec::new(),
        }
    }

    /// Follow-up to run when the signal is dismissed without a choice.
    pub fn on_dismiss(&self) -> Option<FollowUp> {
        match self {
            Signal::TemporaryProfileActive { profile } => Some(FollowUp::AcknowledgeTemporary {
                name: profile.clone(),
            }),
            _ => None,
        }
    }

    /// Follow-up the UI runs straight away, without asking.
    pub fn immediate(&self) -> Option<FollowUp> {
        match self {
            Signal::NeedsEnable {
                profile,
                extensions,
                presentation: Presentation::Search,
            } => Some(show_extensions(
                profile,
                Disposition::Enable,
                extensions.join(" "),
            )),
            _ => None,
        }
    }
}

fn show_extensions(profile: &str, disposition: Disposition, query: String) -> FollowUp {
    FollowUp::ShowExtensions {
        profile: profile.to_string(),
        disposition,
        query,
    }
}

fn profile_follow_up(profile: &str, action: ProfileAction) -> FollowUp {
    FollowUp::Profile {
        name: profile.to_string(),
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_marks_active_and_undefined() {
        assert_eq!(ProfileRef::new("Work", true, false).display_name(), "Work");
        assert_eq!(
            ProfileRef::new("Work", true, true).display_name(),
            "(Active) Work"
        );
        assert_eq!(
            ProfileRef::new("Ghost", false, true).display_name(),
            "(Active) Ghost (PROFILE NOT DEFINED)"
        );
    }

    #[test]
    fn startup_notification_offers_search_but_activate_runs_it_immediately() {
        let notify = Signal::NeedsEnable {
            profile: "Work".to_string(),
            extensions: vec!["a.b".to_string(), "c.d".to_string()],
            presentation: Presentation::Notification,
        };
        assert!(notify.immediate().is_none());
        assert_eq!(notify.offers()[0].label, "Show Extensions to Enable");

        let search = Signal::NeedsEnable {
            profile: "Work".to_string(),
            extensions: vec!["a.b".to_string(), "c.d".to_string()],
            presentation: Presentation::Search,
        };
        assert!(search.offers().is_empty());
        assert_eq!(
            search.immediate(),
            Some(FollowUp::ShowExtensions {
                profile: "Work".to_string(),
                disposition: Disposition::Enable,
                query: "a.b c.d".to_string(),
            })
        );
    }

    #[test]
    fn completed_without_view_has_no_offers() {
        let s = Signal::Completed {
            profile: "Gone".to_string(),
            message: "Profile 'Gone' deactivated".to_string(),
            offer_view: false,
        };
        assert!(s.offers().is_empty());
        assert_eq!(s.severity(), Severity::Info);
    }

    #[test]
    fn temporary_profile_dismissal_falls_through() {
        let s = Signal::TemporaryProfileActive {
            profile: "Demo".to_string(),
        };
        assert_eq!(
            s.on_dismiss(),
            Some(FollowUp::AcknowledgeTemporary {
                name: "Demo".to_string()
            })
        );
        let labels: Vec<String> = s.offers().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Deactivate Profile", "View Profile"]);
    }
}
