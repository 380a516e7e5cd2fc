use async_trait::async_trait;
pub use reel_common::error::backend_error::BackendError;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// The Backend trait is the unified interface every browser driver implements.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, connect to a WebDriver server, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Evaluate a JavaScript expression in the page and return its JSON value.
    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, BackendError>;

    /// Capture a screenshot of the current viewport as PNG bytes.
    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError>;
}
