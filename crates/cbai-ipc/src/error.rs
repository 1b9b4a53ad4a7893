#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket file absent: the agent was never started (or cleaned up).
    #[error("Agent not running. Start with: clipboard-ai-agent")]
    NotRunning,

    /// Socket file present but nothing accepts connections.
    #[error("Agent not responding. Try restarting.")]
    NotResponding,

    /// The agent handled the request and reported a failure.
    #[error("{message}")]
    Agent { message: String },

    #[error("invalid JSON response: {body}")]
    InvalidResponse { body: String },

    #[error("agent request failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IpcError {
    /// Normalize a connect failure into the user-facing taxonomy.
    #[must_use]
    pub fn from_connect(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotRunning,
            std::io::ErrorKind::ConnectionRefused => Self::NotResponding,
            _ => Self::Io(err),
        }
    }
}
