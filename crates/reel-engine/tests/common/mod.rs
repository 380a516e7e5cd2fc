#![allow(dead_code)]

use async_trait::async_trait;
use reel_engine::backend::{Backend, BackendError, NavigationResult};
use reel_engine::bridge::BrowserBridge;
use reel_engine::config::ReelConfig;
use reel_engine::config::schema::BridgeConfig;
use reel_engine::scanner::{ELEMENT_PROBE_JS, POPUP_COUNT_JS, POPUP_INFO_JS};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// What the fake page answers, plus what the fake driver was asked to do.
#[derive(Debug, Default)]
pub struct MockPage {
    pub element: Option<Value>,
    pub popup_count: Option<u64>,
    pub popup_info: Option<Value>,
    pub fail_navigation: bool,
    pub fail_scripts: bool,
    pub launched: bool,
    pub navigations: Vec<String>,
    pub screenshots: usize,
    pub closes: usize,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub page: Arc<Mutex<MockPage>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> std::sync::MutexGuard<'_, MockPage> {
        self.page.lock().unwrap()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        self.page().launched = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        let mut page = self.page();
        page.closes += 1;
        page.launched = false;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.page().launched
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let mut page = self.page();
        if page.fail_navigation {
            return Err(BackendError::Navigation(format!("cannot reach {}", url)));
        }
        page.navigations.push(url.to_string());
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Mock".to_string(),
        })
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, BackendError> {
        let page = self.page();
        if page.fail_scripts {
            return Err(BackendError::ScriptError("page crashed".into()));
        }
        let value = if script == ELEMENT_PROBE_JS {
            page.element.clone()
        } else if script == POPUP_COUNT_JS {
            page.popup_count.map(|count| json!(count))
        } else if script == POPUP_INFO_JS {
            page.popup_info.clone()
        } else {
            None
        };
        Ok(value.unwrap_or(Value::Null))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        self.page().screenshots += 1;
        Ok(b"\x89PNG".to_vec())
    }
}

pub fn bridge_for(mock: &MockBackend) -> BrowserBridge {
    BrowserBridge::new(Box::new(mock.clone()), &BridgeConfig::default())
}

/// No click settle delay, and a popup poll slow enough to stay out of the way.
pub fn test_config(output_dir: &Path) -> ReelConfig {
    let mut config = ReelConfig::default();
    config.recording.click_settle_ms = 0;
    config.recording.popup_poll_interval_ms = 3_600_000;
    config.recording.output_dir = output_dir.to_path_buf();
    config
}

pub fn text_input() -> Value {
    json!({
        "tag": "input",
        "id": "",
        "className": "input1",
        "name": "",
        "type": "text",
        "placeholder": "",
        "text": "",
        "siblingIndex": 1
    })
}

pub fn submit_button() -> Value {
    json!({
        "tag": "button",
        "id": "submit",
        "className": "btn btn-primary",
        "name": "submit",
        "type": "submit",
        "placeholder": "",
        "text": "Send",
        "siblingIndex": 0
    })
}

/// Let spawned tasks run up to their next real wait.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
