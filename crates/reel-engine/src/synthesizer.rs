//! Selector Synthesizer: element snapshot to ranked locators.
//!
//! Strategies are tried from most to least stable: identity, semantic
//! attributes, class tokens, short text, structural paths and finally the
//! sibling position. Every applicable strategy contributes a candidate so the
//! replay helpers have something to fall back to.

use reel_common::{ElementDescriptor, ElementSnapshot, Selector};
use std::collections::HashSet;

/// Texts longer than this are treated as dynamic content and not matched on.
pub const MAX_TEXT_SELECTOR_CHARS: usize = 50;

/// Length of the text snippet kept on the descriptor.
pub const TEXT_SNIPPET_CHARS: usize = 50;

/// Build the descriptor for `snapshot`, or `None` when nothing identifiable
/// was focused or hovered.
pub fn describe(snapshot: &ElementSnapshot) -> Option<ElementDescriptor> {
    if snapshot.is_page_root() {
        return None;
    }

    let selectors = synthesize(snapshot);
    if selectors.is_empty() {
        return None;
    }

    Some(ElementDescriptor {
        tag: snapshot.tag.clone(),
        id: snapshot.id.clone(),
        class_attribute: snapshot.class_name.clone(),
        text: snapshot
            .text
            .trim()
            .chars()
            .take(TEXT_SNIPPET_CHARS)
            .collect(),
        input_type: snapshot.input_type.clone(),
        name: snapshot.name.clone(),
        selectors,
    })
}

/// Ranked, deduplicated locator candidates for `snapshot`.
pub fn synthesize(snapshot: &ElementSnapshot) -> Vec<Selector> {
    if snapshot.is_page_root() {
        return Vec::new();
    }

    let tag = snapshot.tag.as_str();
    let id = snapshot.id.trim();
    let first_class = snapshot.first_class();
    let mut candidates = Vec::new();

    if !id.is_empty() {
        candidates.push(Selector::id(id));
    }

    if !snapshot.name.is_empty() {
        candidates.push(Selector::css(format!(
            "[name=\"{}\"]",
            css_escape(&snapshot.name)
        )));
    }

    if tag == "input" && !snapshot.input_type.is_empty() && !snapshot.placeholder.is_empty() {
        candidates.push(Selector::css(format!(
            "input[type=\"{}\"][placeholder=\"{}\"]",
            css_escape(&snapshot.input_type),
            css_escape(&snapshot.placeholder)
        )));
    }

    for class in snapshot.class_tokens() {
        candidates.push(Selector::class(class));
    }

    let text = snapshot.text.trim();
    let text_len = text.chars().count();
    if (1..=MAX_TEXT_SELECTOR_CHARS).contains(&text_len) {
        if let Some(literal) = xpath_literal(text) {
            candidates.push(Selector::xpath(format!(
                "//{}[contains(text(),{})]",
                tag, literal
            )));
        }
    }

    let id_literal = (!id.is_empty()).then(|| xpath_literal(id)).flatten();
    let class_literal = first_class.and_then(xpath_literal);
    let structural = match (id_literal, class_literal) {
        (Some(id), _) => format!("//{}[@id={}]", tag, id),
        (None, Some(class)) => format!("//{}[contains(@class,{})]", tag, class),
        (None, None) => format!("//{}", tag),
    };
    candidates.push(Selector::xpath(structural));

    let compound = if !id.is_empty() {
        if is_css_identifier(id) {
            format!("{}#{}", tag, id)
        } else {
            format!("{}[id=\"{}\"]", tag, css_escape(id))
        }
    } else if let Some(class) = first_class {
        if is_css_identifier(class) {
            format!("{}.{}", tag, class)
        } else {
            format!("{}[class~=\"{}\"]", tag, css_escape(class))
        }
    } else {
        tag.to_string()
    };
    candidates.push(Selector::css(compound));

    if let Some(index) = snapshot.sibling_index {
        candidates.push(Selector::position(format!(
            "{}:nth-child({})",
            tag,
            index + 1
        )));
    }

    dedup_preserving_order(candidates)
}

/// Drop later candidates whose replay locator was already produced.
fn dedup_preserving_order(candidates: Vec<Selector>) -> Vec<Selector> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|selector| seen.insert(selector.locator()))
        .collect()
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// XPath 1.0 has no escape sequences, so pick whichever quote the value lacks.
fn xpath_literal(value: &str) -> Option<String> {
    if !value.contains('"') {
        Some(format!("\"{}\"", value))
    } else if !value.contains('\'') {
        Some(format!("'{}'", value))
    } else {
        None
    }
}

fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
