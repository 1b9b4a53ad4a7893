//! Newline-delimited JSON request/response client over the agent socket.
//!
//! Each call opens a fresh connection, writes one request frame, and
//! reads one response frame. The agent closes the connection after
//! replying.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use cbai_core::config::AgentConfig;

use crate::error::IpcError;
use crate::types::{ActionResponse, ClipboardResponse, StatusResponse};

/// Overrides the agent socket location (tests and automation).
pub const SOCKET_PATH_ENV: &str = "CBAI_SOCKET_PATH";

#[derive(Debug, Serialize)]
struct RequestFrame<'a> {
    method: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseFrame {
    ok: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AgentClient {
    socket_path: PathBuf,
}

impl AgentClient {
    #[must_use]
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Client at `$CBAI_SOCKET_PATH`, else `~/.clipboard-ai/agent.sock`.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(SOCKET_PATH_ENV)
            .map_or_else(|_| cbai_core::paths::app_dir().join("agent.sock"), PathBuf::from);
        Self::new(path)
    }

    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or replies with a failure.
    pub async fn status(&self) -> Result<StatusResponse, IpcError> {
        self.request("GET", "/status", None).await
    }

    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or replies with a failure.
    pub async fn clipboard(&self) -> Result<ClipboardResponse, IpcError> {
        self.request("GET", "/clipboard", None).await
    }

    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or replies with a failure.
    pub async fn config(&self) -> Result<AgentConfig, IpcError> {
        self.request("GET", "/config", None).await
    }

    /// Ask the agent itself to run an action, optionally on explicit text.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or replies with a failure.
    pub async fn run_action(
        &self,
        action: &str,
        text: Option<&str>,
    ) -> Result<ActionResponse, IpcError> {
        let body = serde_json::json!({ "action": action, "text": text });
        self.request("POST", "/action", Some(body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, IpcError> {
        if !self.socket_path.exists() {
            return Err(IpcError::NotRunning);
        }

        let mut stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(IpcError::from_connect)?;

        let frame = RequestFrame { method, path, body };
        let mut request = serde_json::to_string(&frame)
            .map_err(|e| IpcError::InvalidResponse { body: e.to_string() })?;
        request.push('\n');
        stream.write_all(request.as_bytes()).await?;

        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).await?;
        if line.trim().is_empty() {
            return Err(IpcError::NotResponding);
        }

        let response: ResponseFrame = serde_json::from_str(&line).map_err(|_| {
            IpcError::InvalidResponse {
                body: line.trim().to_owned(),
            }
        })?;

        if !response.ok {
            return Err(IpcError::Agent {
                message: response.error.unwrap_or_else(|| "Unknown error".to_owned()),
            });
        }

        serde_json::from_value(response.data.unwrap_or(Value::Null)).map_err(|_| {
            IpcError::InvalidResponse {
                body: line.trim().to_owned(),
            }
        })
    }
}
