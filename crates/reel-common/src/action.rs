use crate::element::ElementDescriptor;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One entry of the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: u64,
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActionKind {
    Navigate { url: String },
    Click { element: ElementDescriptor },
    TypeText { text: String, element: ElementDescriptor },
    Enter,
    PopupDetected { popup: PopupRecord },
}

impl ActionKind {
    /// The wire name of this kind, matching the `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Navigate { .. } => "navigate",
            ActionKind::Click { .. } => "click",
            ActionKind::TypeText { .. } => "type_text",
            ActionKind::Enter => "enter",
            ActionKind::PopupDetected { .. } => "popup_detected",
        }
    }

    pub fn element(&self) -> Option<&ElementDescriptor> {
        match self {
            ActionKind::Click { element } | ActionKind::TypeText { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// Signature of a transient overlay (dialog, modal, alert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRecord {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "class")]
    pub class_attribute: String,
    /// Trimmed text content, at most 100 characters.
    #[serde(default, rename = "content")]
    pub content_snippet: String,
    #[serde(default)]
    pub visible: bool,
}

impl PopupRecord {
    /// Placeholder used when the describer cannot find the overlay.
    pub fn unknown() -> Self {
        Self {
            tag: "unknown".to_string(),
            id: String::new(),
            class_attribute: String::new(),
            content_snippet: String::new(),
            visible: false,
        }
    }
}
