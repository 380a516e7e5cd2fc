use crate::action::{Action, PopupRecord};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Frozen, persisted form of a recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    /// Finalization time.
    pub timestamp: DateTime<Local>,
    /// When recording started. Older records may not carry it.
    #[serde(default)]
    pub started_at: Option<DateTime<Local>>,
    pub total_actions: usize,
    pub detected_popups: Vec<PopupRecord>,
    pub actions: Vec<Action>,
}

impl SessionRecord {
    /// URL of the first navigate action, the replay entry point.
    pub fn start_url(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match &action.kind {
            crate::action::ActionKind::Navigate { url } => Some(url.as_str()),
            _ => None,
        })
    }
}
