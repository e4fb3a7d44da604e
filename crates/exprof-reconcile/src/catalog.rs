use std::collections::BTreeSet;

use exprof_config::ProfilesConfig;

use crate::ProfileRef;

/// List every known profile name.
///
/// Each active name yields exactly one activated ref (dangling names included),
/// each remaining defined name yields one inactive ref.
///
/// - `list_active_profiles_first`: activated refs first, then the rest, each
///   bucket in case-sensitive name order.
/// - otherwise: defined profiles in name order, then dangling active names in
///   active-list order.
pub fn list_profile_refs(config: &ProfilesConfig) -> Vec<ProfileRef> {
    let active: BTreeSet<&str> = config.active_profiles.iter().map(String::as_str).collect();

    let mut defined: Vec<ProfileRef> = config
        .profiles
        .keys()
        .map(|name| ProfileRef::new(name.clone(), true, active.contains(name.as_str())))
        .collect();

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut dangling: Vec<ProfileRef> = Vec::new();
    for name in &config.active_profiles {
        if !config.is_defined(name) && seen.insert(name.as_str()) {
            dangling.push(ProfileRef::new(name.clone(), false, true));
        }
    }

    if !config.list_active_profiles_first {
        defined.extend(dangling);
        return defined;
    }

    let (mut top, bottom): (Vec<ProfileRef>, Vec<ProfileRef>) =
        defined.into_iter().partition(|r| r.activated);
    top.extend(dangling);
    top.sort_by(|a, b| a.name.cmp(&b.name));

    top.extend(bottom);
    top
}
