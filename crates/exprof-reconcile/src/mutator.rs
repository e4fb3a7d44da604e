use exprof_config::{ConfigStore, StoreError};
use tracing::debug;

/// Add `name` to (or remove every occurrence of it from) `current` and write
/// the whole list back. One attempt, no retry.
///
/// Adding an already active name leaves the list as it is but still writes.
pub fn set_active(
    store: &dyn ConfigStore,
    current: &[String],
    name: &str,
    add: bool,
) -> Result<Vec<String>, StoreError> {
    let next: Vec<String> = if add && current.iter().any(|p| p == name) {
        current.to_vec()
    } else if add {
        current
            .iter()
            .cloned()
            .chain(std::iter::once(name.to_string()))
            .collect()
    } else {
        current.iter().filter(|p| *p != name).cloned().collect()
    };

    store.update_active_profiles(&next)?;
    debug!(profile = name, add, active = ?next, "active profiles updated");
    Ok(next)
}
