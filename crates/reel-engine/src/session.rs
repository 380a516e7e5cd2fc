use crate::action_log::ActionLog;
use crate::bridge::BrowserBridge;
use crate::error::RecorderError;
use chrono::{DateTime, Local};
use reel_common::{ActionKind, PopupRecord, SessionRecord};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// One recording run.
///
/// Shared between the signal dispatcher and the popup monitor; all mutation
/// goes through the action log, the popup list and the screenshot counter.
#[derive(Debug)]
pub struct Session {
    id: String,
    started_at: DateTime<Local>,
    output_dir: PathBuf,
    log: ActionLog,
    popups: Mutex<Vec<PopupRecord>>,
    screenshot_count: AtomicU32,
    finalized: AtomicBool,
}

impl Session {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let started_at = Local::now();
        let id = started_at.format("%Y%m%d_%H%M%S").to_string();
        Self::with_id(id, started_at, output_dir)
    }

    pub fn with_id(
        id: impl Into<String>,
        started_at: DateTime<Local>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            started_at,
            output_dir: output_dir.into(),
            log: ActionLog::new(),
            popups: Mutex::new(Vec::new()),
            screenshot_count: AtomicU32::new(0),
            finalized: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn record(&self, kind: ActionKind) -> u64 {
        self.log.record(kind)
    }

    /// Record a detected popup: one entry in the popup list and one action.
    pub fn record_popup(&self, popup: PopupRecord) -> u64 {
        // Held across the append so the popup list and the log agree on order.
        let mut popups = self.popups.lock().unwrap_or_else(PoisonError::into_inner);
        popups.push(popup.clone());
        self.log.record(ActionKind::PopupDetected { popup })
    }

    pub fn popups(&self) -> Vec<PopupRecord> {
        self.popups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn screenshot_count(&self) -> u32 {
        self.screenshot_count.load(Ordering::SeqCst)
    }

    pub fn screenshot_path(&self, index: u32, tag: &str) -> PathBuf {
        self.output_dir
            .join(format!("screenshot_{}_{:02}_{}.png", self.id, index, tag))
    }

    /// Capture the viewport and write it next to the session artifacts.
    /// Failures are logged and yield `None`.
    pub async fn capture_screenshot(&self, bridge: &BrowserBridge, tag: &str) -> Option<PathBuf> {
        let bytes = bridge.screenshot().await?;
        let index = self.screenshot_count.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.screenshot_path(index, tag);

        match tokio::fs::write(&path, bytes).await {
            Ok(()) => {
                debug!("Screenshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write screenshot {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Freeze the session into its persisted form. Only the first call succeeds.
    pub fn finalize(&self) -> Result<SessionRecord, RecorderError> {
        if self.finalized.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::AlreadyFinalized(self.id.clone()));
        }

        let actions = self.log.snapshot();
        Ok(SessionRecord {
            session_id: self.id.clone(),
            timestamp: Local::now(),
            started_at: Some(self.started_at),
            total_actions: actions.len(),
            detected_popups: self.popups(),
            actions,
        })
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }
}
