//! exprof-reconcile
//!
//! Extension profile reconciliation: which add-ons and settings of a profile
//! are out of sync with the host, and what the user should be shown.
//!
//! - ProfileCatalog: [`list_profile_refs`]
//! - ReconciliationEngine: [`ProfileEngine::reconcile`], [`compute_delta`]
//! - ActiveSetMutator: [`set_active`]
//! - StartupScanner: [`run_startup_check`]
//!
//! Host state and the settings store are injected traits. The engine returns
//! [`Signal`]s for the UI to render and never returns errors.

mod batch;
mod catalog;
mod commands;
mod engine;
mod host;
mod mutator;
mod startup;
mod types;

pub use batch::{search_batches, split_batch, MAX_SEARCH_CHARS};
pub use catalog::list_profile_refs;
pub use commands::profile_choices;
pub use engine::{compute_delta, ProfileEngine, ReconcileOutcome};
pub use host::HostState;
pub use mutator::set_active;
pub use startup::{run_startup_check, STARTUP_DELAY};
pub use types::*;
