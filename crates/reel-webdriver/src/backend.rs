use crate::webdriver::{WebDriverClient, wrap_expression};
use async_trait::async_trait;
use reel_engine::backend::{Backend, BackendError, NavigationResult};
use tracing::info;

/// Any browser behind a running WebDriver server (chromedriver,
/// geckodriver, msedgedriver).
pub struct WebDriverBackend {
    client: Option<WebDriverClient>,
    webdriver_url: String,
}

impl WebDriverBackend {
    pub fn with_url(webdriver_url: impl Into<String>) -> Self {
        Self {
            client: None,
            webdriver_url: webdriver_url.into(),
        }
    }

    async fn navigation_result(client: &WebDriverClient) -> Result<NavigationResult, BackendError> {
        let title = client.client.title().await.unwrap_or_default();
        let url = client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(NavigationResult { url, title })
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Connecting to WebDriver at {}...", self.webdriver_url);
        let client = WebDriverClient::connect(&self.webdriver_url)
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
            .client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::navigation_result(client).await
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;
        client
            .client
            .execute(&wrap_expression(script), vec![])
            .await
            .map_err(|e| BackendError::ScriptError(e.to_string()))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;
        client
            .client
            .screenshot()
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))
    }
}
