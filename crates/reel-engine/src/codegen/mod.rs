//! Code Generator: frozen session record to replay script.
//!
//! Generation is split in two: [`plan`] turns the action log into a
//! structured [`ScriptPlan`], and [`python::render`] prints that plan with
//! fixed helper definitions. Both are pure, so the same record and options
//! always produce the same bytes.

pub mod python;

use crate::config::schema::ReplayConfig;
use chrono::{DateTime, Local};
use reel_common::{ActionKind, SessionRecord};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Session {0} has no navigate action to start from")]
    MissingNavigate(String),
}

/// Header facts, all taken from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptHeader {
    pub session_id: String,
    pub recorded_at: DateTime<Local>,
    pub total_actions: usize,
    pub popups_detected: usize,
}

/// One replay step, in log order.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Click {
        selectors: Vec<String>,
        description: String,
    },
    TypeText {
        selectors: Vec<String>,
        text: String,
        description: String,
    },
    Enter,
    Navigate {
        url: String,
    },
    PopupSettle,
}

impl Step {
    /// Suffix of the step screenshot file.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Click { .. } => "click",
            Step::TypeText { .. } => "type",
            Step::Enter => "enter",
            Step::Navigate { .. } => "navigate",
            Step::PopupSettle => "popup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptPlan {
    pub header: ScriptHeader,
    pub start_url: String,
    pub steps: Vec<Step>,
}

/// Build the step list: the first navigate becomes the entry point and
/// every later action becomes one step.
pub fn plan(record: &SessionRecord) -> Result<ScriptPlan, CodegenError> {
    let (start, start_url) = record
        .actions
        .iter()
        .enumerate()
        .find_map(|(index, action)| match &action.kind {
            ActionKind::Navigate { url } => Some((index, url.clone())),
            _ => None,
        })
        .ok_or_else(|| CodegenError::MissingNavigate(record.session_id.clone()))?;

    let steps = record
        .actions
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != start)
        .map(|(_, action)| match &action.kind {
            ActionKind::Navigate { url } => Step::Navigate { url: url.clone() },
            ActionKind::Click { element } => Step::Click {
                selectors: element.selectors.iter().map(|s| s.locator()).collect(),
                description: element.describe().to_string(),
            },
            ActionKind::TypeText { text, element } => Step::TypeText {
                selectors: element.selectors.iter().map(|s| s.locator()).collect(),
                text: text.clone(),
                description: element.describe().to_string(),
            },
            ActionKind::Enter => Step::Enter,
            ActionKind::PopupDetected { .. } => Step::PopupSettle,
        })
        .collect();

    Ok(ScriptPlan {
        header: ScriptHeader {
            session_id: record.session_id.clone(),
            recorded_at: record.started_at.unwrap_or(record.timestamp),
            total_actions: record.total_actions,
            popups_detected: record.detected_popups.len(),
        },
        start_url,
        steps,
    })
}

/// Generate the replay script for `record`.
pub fn generate(record: &SessionRecord, options: &ReplayConfig) -> Result<String, CodegenError> {
    let plan = plan(record)?;
    Ok(python::render(&plan, options))
}
