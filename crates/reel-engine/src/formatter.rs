use crate::config::schema::SecurityConfig;
use reel_common::{Action, ActionKind, ElementDescriptor};
use std::borrow::Cow;

const MASK: &str = "********";

/// Whether text typed into `element` should be hidden from logs.
pub fn is_sensitive(element: &ElementDescriptor, security: &SecurityConfig) -> bool {
    if element.input_type.eq_ignore_ascii_case("password") {
        return true;
    }
    let name = element.name.to_ascii_lowercase();
    let id = element.id.to_ascii_lowercase();
    security.sensitive_fields.iter().any(|field| {
        let field = field.to_ascii_lowercase();
        name.contains(&field) || id.contains(&field)
    })
}

/// Typed text as it may appear in logs.
pub fn display_text<'a>(
    text: &'a str,
    element: &ElementDescriptor,
    security: &SecurityConfig,
) -> Cow<'a, str> {
    if security.redact_in_logs && is_sensitive(element, security) {
        Cow::Borrowed(MASK)
    } else {
        Cow::Borrowed(text)
    }
}

/// One-line operator summary of a recorded action.
pub fn format_action(action: &Action, security: &SecurityConfig) -> String {
    match &action.kind {
        ActionKind::Navigate { url } => format!("#{} navigate {}", action.id, url),
        ActionKind::Click { element } => format!(
            "#{} click <{}> with {} selectors{}",
            action.id,
            element.describe(),
            element.selectors.len(),
            format_top_selectors(element)
        ),
        ActionKind::TypeText { text, element } => format!(
            "#{} type '{}' into <{}> with {} fallback selectors",
            action.id,
            display_text(text, element, security),
            element.describe(),
            element.selectors.len()
        ),
        ActionKind::Enter => format!("#{} enter", action.id),
        ActionKind::PopupDetected { popup } => {
            if popup.id.is_empty() {
                format!("#{} popup <{}>", action.id, popup.tag)
            } else {
                format!("#{} popup <{}#{}>", action.id, popup.tag, popup.id)
            }
        }
    }
}

fn format_top_selectors(element: &ElementDescriptor) -> String {
    let mut out = String::new();
    for (i, selector) in element.selectors.iter().take(3).enumerate() {
        out.push_str(&format!("\n   {}. {}", i + 1, selector));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use reel_common::Selector;

    fn field(input_type: &str, name: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag: "input".into(),
            id: String::new(),
            class_attribute: String::new(),
            text: String::new(),
            input_type: input_type.into(),
            name: name.into(),
            selectors: vec![Selector::css(format!("[name=\"{}\"]", name))],
        }
    }

    #[test]
    fn password_fields_are_masked() {
        let security = SecurityConfig::default();
        assert_eq!(
            display_text("hunter2", &field("password", "pw"), &security),
            MASK
        );
        assert_eq!(
            display_text("1234", &field("text", "api_token"), &security),
            MASK
        );
        assert_eq!(
            display_text("alice", &field("text", "user"), &security),
            "alice"
        );
    }

    #[test]
    fn masking_can_be_disabled() {
        let security = SecurityConfig {
            redact_in_logs: false,
            ..SecurityConfig::default()
        };
        assert_eq!(
            display_text("hunter2", &field("password", "pw"), &security),
            "hunter2"
        );
    }

    #[test]
    fn click_summary_lists_top_three() {
        let mut element = field("submit", "go");
        element.tag = "button".into();
        element.selectors = vec![
            Selector::id("go"),
            Selector::class("a"),
            Selector::class("b"),
            Selector::class("c"),
        ];
        let action = Action {
            id: 4,
            timestamp: Local::now(),
            kind: ActionKind::Click { element },
        };
        let line = format_action(&action, &SecurityConfig::default());
        assert!(line.starts_with("#4 click <button> with 4 selectors"));
        assert!(line.contains("3. class:b"));
        assert!(!line.contains("class:c"));
    }
}
