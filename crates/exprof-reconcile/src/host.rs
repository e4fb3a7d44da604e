/// Live add-on and setting state, queried from the host editor.
///
/// Queries are cheap and side-effect free; the engine may call them any
/// number of times within one operation.
pub trait HostState {
    /// True if the add-on is installed and enabled.
    fn is_enabled(&self, extension_id: &str) -> bool;

    /// True if `key` has a value at workspace scope, or at every
    /// workspace-folder scope.
    fn is_set_at_workspace_scope(&self, key: &str) -> bool;
}
