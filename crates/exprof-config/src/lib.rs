//! exprof-config
//!
//! Profile data model plus the settings layer it is read from.
//!
//! Host settings are YAML documents merged user -> workspace (later wins).
//! The profile engine only ever sees the `extension-profiles` section of the
//! merged tree, decoded into [`ProfilesConfig`].

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

mod consumption;
mod profiles;
mod store;

pub use consumption::consumed_pointers;
pub use profiles::{ProfileDefinition, ProfilesConfig};
pub use store::{has_setting, ConfigStore, StoreError, YamlSettingsStore};

/// Settings key the profile section lives under.
pub const SECTION: &str = "extension-profiles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Leaf pointers (relative to the section) nothing reads, sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report leaves of the `extension-profiles` section that no reader consumes,
/// typically misspelled keys such as `disabledExtension`.
///
/// With `UnusedKeyPolicy::Fail` a non-clean report is an error.
pub fn report_unused_keys(section: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = consumed_pointers(section).into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(section, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unknown key(s) under '{}'. First few: {}",
            report.unused_leaf_pointers.len(),
            SECTION,
            preview_list(&report.unused_leaf_pointers, 12)
        );
    }

    Ok(report)
}

/// Return true if `prefix` is a JSON-pointer prefix of `leaf`.
///
/// "/a/b" consumes "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.starts_with(prefix)
        && leaf
            .get(prefix.len()..prefix.len() + 1)
            .map(|c| c == "/")
            .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

pub(crate) fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).cloned().collect::<Vec<_>>();
    format!("{:?}", take)
}

/// Merged settings tree plus the decoded profile section.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// Whole merged settings tree (all keys, not just the profile section).
    pub settings_json: Value,
    /// The `extension-profiles` section, flat dotted keys folded in.
    pub section_json: Value,
    /// Canonical JSON of `section_json`.
    pub canonical_json: String,
    /// sha256 of `canonical_json`, hex encoded.
    pub config_hash: String,
    pub profiles: ProfilesConfig,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedSettings> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p).with_context(|| format!("failed to read settings path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedSettings> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        merged = deep_merge(merged, fold_flat_keys(parse_yaml_doc(raw)?));
    }

    let section_json = section_of(&merged);
    let profiles: ProfilesConfig = serde_json::from_value(section_json.clone())
        .with_context(|| format!("invalid '{SECTION}' settings section"))?;

    let canonical_json = canonicalize_json(&section_json)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedSettings {
        settings_json: merged,
        section_json,
        canonical_json,
        config_hash,
        profiles,
    })
}

/// Parse one YAML layer. An empty document is an empty object.
pub(crate) fn parse_yaml_doc(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
    let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
    Ok(match v_json {
        Value::Null => serde_json::json!({}),
        other => other,
    })
}

/// Move flat keys such as `extension-profiles.activeProfiles` into the nested
/// section of the same layer, so precedence between layers is decided on the
/// nested form. Within a layer the flat key wins.
pub(crate) fn fold_flat_keys(layer: Value) -> Value {
    let Value::Object(root) = layer else {
        return layer;
    };

    let flat_prefix = format!("{SECTION}.");
    let (flat, mut rest): (serde_json::Map<String, Value>, serde_json::Map<String, Value>) = root
        .into_iter()
        .partition(|(k, _)| k.starts_with(&flat_prefix));
    if flat.is_empty() {
        return Value::Object(rest);
    }

    let mut section = match rest.remove(SECTION) {
        Some(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    for (k, v) in flat {
        let field = k[flat_prefix.len()..].to_string();
        let existing = section.remove(&field).unwrap_or(Value::Null);
        section.insert(field, deep_merge(existing, v));
    }
    rest.insert(SECTION.to_string(), Value::Object(section));
    Value::Object(rest)
}

/// Extract the profile section, folding flat keys such as
/// `extension-profiles.activeProfiles` over the nested object.
pub fn section_of(settings: &Value) -> Value {
    let mut section = match settings.get(SECTION) {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => serde_json::json!({}),
    };

    if let Some(root) = settings.as_object() {
        let flat_prefix = format!("{SECTION}.");
        for (k, v) in root {
            if let Some(field) = k.strip_prefix(&flat_prefix) {
                let existing = section
                    .get(field)
                    .cloned()
                    .unwrap_or(Value::Null);
                if let Some(obj) = section.as_object_mut() {
                    obj.insert(field.to_string(), deep_merge(existing, v.clone()));
                }
            }
        }
    }
    section
}

pub(crate) fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json::Map is BTreeMap-backed without `preserve_order`, so keys
    // serialize sorted.
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
