use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Pause between a click and the element probe, letting the page react.
    #[serde(default = "default_click_settle_ms")]
    pub click_settle_ms: u64,
    #[serde(default = "default_popup_poll_interval_ms")]
    pub popup_poll_interval_ms: u64,
    /// Where screenshots, session records and generated scripts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
}

impl RecordingConfig {
    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn popup_poll_interval(&self) -> Duration {
        Duration::from_millis(self.popup_poll_interval_ms.max(1))
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            click_settle_ms: default_click_settle_ms(),
            popup_poll_interval_ms: default_popup_poll_interval_ms(),
            output_dir: default_output_dir(),
            hotkeys: HotkeyConfig::default(),
        }
    }
}

fn default_click_settle_ms() -> u64 {
    150
}

fn default_popup_poll_interval_ms() -> u64 {
    500
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("recordings")
}

/// Operator hotkeys, by key name (`F1` .. `F12`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    #[serde(default = "default_toggle_key")]
    pub toggle: String,
    #[serde(default = "default_finish_key")]
    pub finish: String,
    #[serde(default = "default_screenshot_key")]
    pub screenshot: String,
    #[serde(default = "default_popup_check_key")]
    pub popup_check: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle_key(),
            finish: default_finish_key(),
            screenshot: default_screenshot_key(),
            popup_check: default_popup_check_key(),
        }
    }
}

fn default_toggle_key() -> String {
    "F10".to_string()
}

fn default_finish_key() -> String {
    "F12".to_string()
}

fn default_screenshot_key() -> String {
    "F9".to_string()
}

fn default_popup_check_key() -> String {
    "F11".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Upper bound for a single script evaluation or screenshot.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
}

impl BridgeConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
        }
    }
}

fn default_call_timeout_ms() -> u64 {
    10000
}

fn default_navigation_timeout_ms() -> u64 {
    30000
}

/// Browser the generated script drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayBrowser {
    #[default]
    Chrome,
    Edge,
    Firefox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub browser: ReplayBrowser,
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    #[serde(default = "default_retry_pause_secs")]
    pub retry_pause_secs: f64,
    #[serde(default = "default_initial_settle_secs")]
    pub initial_settle_secs: f64,
    #[serde(default = "default_step_settle_secs")]
    pub step_settle_secs: f64,
    #[serde(default = "default_popup_settle_secs")]
    pub popup_settle_secs: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            browser: ReplayBrowser::default(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            retry_pause_secs: default_retry_pause_secs(),
            initial_settle_secs: default_initial_settle_secs(),
            step_settle_secs: default_step_settle_secs(),
            popup_settle_secs: default_popup_settle_secs(),
        }
    }
}

fn default_attempt_timeout_secs() -> u64 {
    5
}

fn default_retry_pause_secs() -> f64 {
    1.0
}

fn default_initial_settle_secs() -> f64 {
    3.0
}

fn default_step_settle_secs() -> f64 {
    1.5
}

fn default_popup_settle_secs() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_sensitive_fields")]
    pub sensitive_fields: Vec<String>,
    #[serde(default = "default_redact_in_logs")]
    pub redact_in_logs: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sensitive_fields: default_sensitive_fields(),
            redact_in_logs: default_redact_in_logs(),
        }
    }
}

fn default_sensitive_fields() -> Vec<String> {
    vec![
        "password".to_string(),
        "token".to_string(),
        "card_number".to_string(),
        "cvv".to_string(),
        "ssn".to_string(),
        "secret".to_string(),
    ]
}

fn default_redact_in_logs() -> bool {
    true
}
