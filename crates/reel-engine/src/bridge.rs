//! Browser Bridge: the only coupling point between the recorder and the live page.
//!
//! One backend is shared by the signal dispatcher and the popup monitor, so
//! every call goes through a mutex. Introspection and screenshots never fail
//! from the caller's point of view: errors and timeouts are logged and turned
//! into `None`. Only navigation propagates errors.

use crate::backend::{Backend, BackendError, NavigationResult};
use crate::config::schema::BridgeConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct BrowserBridge {
    backend: Arc<Mutex<Box<dyn Backend>>>,
    shut_down: Arc<AtomicBool>,
    call_timeout: Duration,
    navigation_timeout: Duration,
}

impl BrowserBridge {
    pub fn new(backend: Box<dyn Backend>, config: &BridgeConfig) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            shut_down: Arc::new(AtomicBool::new(false)),
            call_timeout: config.call_timeout(),
            navigation_timeout: config.navigation_timeout(),
        }
    }

    /// Load `url`, launching the driver first if needed.
    pub async fn navigate(&self, url: &str) -> Result<NavigationResult, BackendError> {
        if self.is_shut_down() {
            return Err(BackendError::NotReady);
        }
        let mut backend = self.backend.lock().await;

        if !backend.is_ready().await {
            info!("Starting browser driver...");
            backend.launch().await.map_err(|e| match e {
                BackendError::Launch(_) => e,
                other => BackendError::Launch(other.to_string()),
            })?;
        }

        tokio::time::timeout(self.navigation_timeout, backend.navigate(url))
            .await
            .map_err(|_| BackendError::TimeoutWithContext {
                operation: format!("navigate to {}", url),
            })?
    }

    /// Evaluate an introspection script. Failures, timeouts and `null`
    /// results all come back as `None`.
    pub async fn evaluate(&self, script: &str) -> Option<serde_json::Value> {
        if self.is_shut_down() {
            debug!("Bridge shut down, skipping evaluation");
            return None;
        }
        let mut backend = self.backend.lock().await;

        match tokio::time::timeout(self.call_timeout, backend.execute_script(script)).await {
            Ok(Ok(serde_json::Value::Null)) => None,
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!("Introspection failed: {}", e);
                None
            }
            Err(_) => {
                warn!(
                    "Introspection timed out after {}ms",
                    self.call_timeout.as_millis()
                );
                None
            }
        }
    }

    /// [`BrowserBridge::evaluate`] followed by deserialization into `T`.
    pub async fn evaluate_as<T: DeserializeOwned>(&self, script: &str) -> Option<T> {
        let value = self.evaluate(script).await?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Unexpected introspection result: {}", e);
                None
            }
        }
    }

    pub async fn screenshot(&self) -> Option<Vec<u8>> {
        if self.is_shut_down() {
            return None;
        }
        let mut backend = self.backend.lock().await;

        match tokio::time::timeout(self.call_timeout, backend.screenshot()).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!("Screenshot failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Screenshot timed out");
                None
            }
        }
    }

    /// Release the driver. Later calls are no-ops.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut backend = self.backend.lock().await;
        info!("Releasing browser");
        if let Err(e) = backend.close().await {
            warn!("Error while closing browser: {}", e);
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}
