use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One named profile as written in settings. The profile name is the key it
/// is stored under in [`ProfilesConfig::profiles`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDefinition {
    /// Extension ids that must be enabled, in presentation order.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Extension ids that must be disabled, in presentation order.
    #[serde(default)]
    pub disabled_extensions: Vec<String>,

    /// Setting key -> desired value.
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,

    /// Warn on startup instead of reconciling while this profile stays active.
    #[serde(default)]
    pub temporary_profile: bool,
}

impl ProfileDefinition {
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.disabled_extensions.is_empty() && self.settings.is_empty()
    }
}

/// Effective `extension-profiles` section.
///
/// Missing keys fall back to [`ProfilesConfig::default`], so an unset section
/// always yields a well-formed, empty configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilesConfig {
    pub profiles: BTreeMap<String, ProfileDefinition>,

    /// May name profiles absent from `profiles`.
    pub active_profiles: Vec<String>,

    pub enable_startup_check: bool,

    pub list_active_profiles_first: bool,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            active_profiles: Vec::new(),
            enable_startup_check: false,
            list_active_profiles_first: true,
        }
    }
}

impl ProfilesConfig {
    pub fn profile(&self, name: &str) -> Option<&ProfileDefinition> {
        self.profiles.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_profiles.iter().any(|p| p == name)
    }

    pub fn with_profile(mut self, name: impl Into<String>, def: ProfileDefinition) -> Self {
        self.profiles.insert(name.into(), def);
        self
    }

    pub fn with_active<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_profiles = names.into_iter().map(Into::into).collect();
        self
    }
}
