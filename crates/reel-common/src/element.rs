use crate::selector::Selector;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw attributes of the focused or hovered element, as reported by the
/// element probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub tag: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub class_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "string_or_empty")]
    pub input_type: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub placeholder: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub text: String,
    /// Zero-based index among the parent's element children; absent for
    /// detached or root elements.
    #[serde(default)]
    pub sibling_index: Option<usize>,
}

/// Accept any JSON value for a text attribute, keeping only strings.
fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

impl ElementSnapshot {
    /// Class tokens in document order.
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.class_name.split_whitespace()
    }

    pub fn first_class(&self) -> Option<&str> {
        self.class_tokens().next()
    }

    pub fn is_page_root(&self) -> bool {
        matches!(self.tag.as_str(), "" | "html" | "body")
    }
}

/// Identifying attributes of an element together with its ranked locators.
///
/// Only ever built with at least one selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: String,
    #[serde(rename = "class")]
    pub class_attribute: String,
    /// Trimmed text content, at most 50 characters.
    pub text: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub selectors: Vec<Selector>,
}

impl ElementDescriptor {
    /// Short label used in logs and generated step descriptions.
    pub fn describe(&self) -> &str {
        if self.tag.is_empty() {
            "element"
        } else {
            &self.tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_string_attributes_read_as_empty() {
        let snapshot: ElementSnapshot = serde_json::from_value(json!({
            "tag": "form",
            "id": {},
            "className": "login",
            "type": null,
            "siblingIndex": 0
        }))
        .unwrap();

        assert_eq!(snapshot.tag, "form");
        assert_eq!(snapshot.id, "");
        assert_eq!(snapshot.input_type, "");
        assert_eq!(snapshot.first_class(), Some("login"));
        assert_eq!(snapshot.sibling_index, Some(0));
    }
}
