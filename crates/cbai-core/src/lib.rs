//! Configuration model, execution context, and safe-mode policy for cbai.

pub mod config;
pub mod context;
pub mod paths;
pub mod safety;
pub mod trust;

pub use config::{AgentConfig, ProviderConfig, Settings};
pub use context::ExecContext;
pub use safety::{ConfirmPrompt, SafeModeError, SafeModeOptions, enforce_safe_mode};
pub use trust::is_cloud_provider;
