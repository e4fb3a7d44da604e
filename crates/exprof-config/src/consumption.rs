//! Registry of the `extension-profiles` keys the engine actually reads.
//!
//! Pointers are relative to the section root. Profile entries are dynamic, so
//! their pointers are derived from the names present in the loaded section.

use serde_json::Value;

static SECTION_KEYS: &[&str] = &["/activeProfiles", "/enableStartupCheck", "/listActiveProfilesFirst"];

static PROFILE_KEYS: &[&str] = &["extensions", "disabledExtensions", "settings", "temporaryProfile"];

pub fn consumed_pointers(section: &Value) -> Vec<String> {
    let mut out: Vec<String> = SECTION_KEYS.iter().map(|p| p.to_string()).collect();

    if let Some(profiles) = section.get("profiles").and_then(Value::as_object) {
        for name in profiles.keys() {
            let tok = crate::escape_pointer_token(name);
            for key in PROFILE_KEYS {
                out.push(format!("/profiles/{tok}/{key}"));
            }
        }
    }
    out
}
