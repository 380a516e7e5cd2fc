use crate::cdp::CdpClient;
use crate::eval::{self, EvalError};
use async_trait::async_trait;
use reel_engine::backend::{Backend, BackendError, NavigationResult};
use tracing::info;

/// Local Chromium driven over the DevTools protocol.
pub struct CdpBackend {
    client: Option<CdpClient>,
    headless: bool,
}

impl CdpBackend {
    pub fn new() -> Self {
        Self::with_headless(false)
    }

    pub fn with_headless(headless: bool) -> Self {
        Self {
            client: None,
            headless,
        }
    }

    async fn navigation_result(page: &chromiumoxide::Page) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult { url, title })
    }
}

impl Default for CdpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for CdpBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Chromium backend...");
        let client = CdpClient::launch(self.headless)
            .await
            .map_err(|e| BackendError::Launch(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        client
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::navigation_result(&client.page).await
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;

        eval::evaluate(&client.page, script)
            .await
            .map_err(|e| match e {
                EvalError::Timeout => BackendError::TimeoutWithContext {
                    operation: "script evaluation".to_string(),
                },
                other => BackendError::ScriptError(other.to_string()),
            })
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;
        client
            .page
            .screenshot(chromiumoxide::page::ScreenshotParams::builder().build())
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))
    }
}
