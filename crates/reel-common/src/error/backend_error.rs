/// Failures reported by a browser driver.
#[derive(thiserror::Error, Debug, Clone)]
pub enum BackendError {
    // ============================================================
    // Lifecycle Errors
    // ============================================================
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    // ============================================================
    // Execution Errors
    // ============================================================
    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {operation}")]
    TimeoutWithContext { operation: String },

    // ============================================================
    // System Errors
    // ============================================================
    #[error("Not ready")]
    NotReady,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl BackendError {
    /// Hint printed next to session-fatal errors.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            BackendError::Launch(_) => {
                "Check that the browser (or WebDriver server) is installed and reachable"
            }
            BackendError::Navigation(_) => "Check URL and network connectivity",
            BackendError::TimeoutWithContext { .. } => "Increase bridge.call_timeout_ms",
            BackendError::NotReady => "Restart the recording",
            _ => "Run with --verbose for details",
        }
    }
}
