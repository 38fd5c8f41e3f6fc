use thiserror::Error;

/// A convenience `Result` alias using [`MeshError`].
pub type MeshResult<T> = Result<T, MeshError>;

/// Top-level error type for the AgentMesh bridge.
///
/// Each variant corresponds to one failure class in the dispatch and
/// orchestration pipeline. Validation and unknown-tool errors are raised
/// before any network I/O; transport and remote-protocol errors come back
/// from the upstream registry or a target agent; timeout and
/// exhausted-retries are terminal outcomes of the orchestrated call.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A required argument is missing or out of range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The invocation named a tool that is not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A non-success HTTP status from the registry or a target agent.
    #[error("Transport error ({status}): {body}")]
    Transport { status: u16, body: String },

    /// An explicit error object in a decoded registry response.
    #[error("Registry error: {0}")]
    RemoteProtocol(String),

    /// An outbound call exceeded its deadline. Never retried.
    #[error("Call timed out after {0}ms")]
    Timeout(u64),

    /// Every attempt of an orchestrated call failed.
    #[error("All {attempts} attempts failed, last error: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the HTTP client itself (connect, DNS, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
