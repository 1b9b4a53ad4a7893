#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("empty response from provider")]
    EmptyResponse,

    #[error("Provider type \"{kind}\" is not supported. Use an OpenAI-compatible endpoint or switch providers.")]
    UnsupportedProvider { kind: String },
}
