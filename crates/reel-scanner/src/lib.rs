//! In-page introspection scripts.
//!
//! Every script is a single JavaScript expression. Backends that need a
//! function body (WebDriver) wrap it in `return (...)`.

/// Describes the focused element, falling back to the innermost hovered one.
/// Evaluates to `null` when only the page root is available.
pub const ELEMENT_PROBE_JS: &str = include_str!("element_probe.js");

/// Counts visible overlays (Material dialogs, Bootstrap modals, ARIA dialogs and alerts).
pub const POPUP_COUNT_JS: &str = include_str!("popup_count.js");

/// Describes the most recently matched overlay, or `null`.
pub const POPUP_INFO_JS: &str = include_str!("popup_info.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_expressions() {
        for script in [ELEMENT_PROBE_JS, POPUP_COUNT_JS, POPUP_INFO_JS] {
            let trimmed = script.trim();
            assert!(trimmed.starts_with("(() =>"), "{}", trimmed);
            assert!(trimmed.ends_with("})()"), "{}", trimmed);
        }
    }

    #[test]
    fn probe_reports_snapshot_fields() {
        for field in ["tag", "className", "placeholder", "siblingIndex"] {
            assert!(ELEMENT_PROBE_JS.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn element_attributes_are_read_from_markup() {
        // A <form> exposes its named controls as properties, so `el.id` can
        // be an input element rather than the id attribute.
        assert!(ELEMENT_PROBE_JS.contains("attr('id')"));
        assert!(!ELEMENT_PROBE_JS.contains("el.id"));
        assert!(ELEMENT_PROBE_JS.contains("typeof el.type === 'string'"));
    }
}
