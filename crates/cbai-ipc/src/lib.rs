//! IPC client for the background clipboard-ai agent.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AgentClient, SOCKET_PATH_ENV};
pub use error::IpcError;
pub use types::{ActionResponse, ClipboardResponse, StatusResponse};
