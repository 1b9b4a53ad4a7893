//! Action orchestration: built-in and plugin actions behind one registry.

pub mod builtin;
pub mod loader;
pub mod registry;
pub mod types;

pub use builtin::builtin_actions;
pub use loader::{load_plugin_actions, plugin_dir};
pub use registry::{ActionRegistry, RegistryError, shared_registry};
pub use types::{ActionBehavior, ActionContext, ActionDefinition, ActionError};
