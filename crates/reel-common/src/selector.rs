use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a selector locates its element.
///
/// `Position` selectors are CSS `nth-child` locators. They keep their own
/// strategy so callers can tell a last-resort structural match apart from a
/// compound CSS match, but they replay through the CSS engine. Parsing
/// recognizes the bare `<tag>:nth-child(<n>)` form under the `css:` prefix
/// and restores `Position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Id,
    Css,
    XPath,
    Class,
    Position,
}

impl Strategy {
    /// Locator prefix understood by the replay helpers.
    pub fn locator_prefix(self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::Css | Strategy::Position => "css",
            Strategy::XPath => "xpath",
            Strategy::Class => "class",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectorParseError {
    #[error("Selector '{0}' has no strategy prefix")]
    MissingPrefix(String),
    #[error("Unknown selector strategy: {0}")]
    UnknownStrategy(String),
}

/// A strategy-tagged locator. Serialized as `"<prefix>:<value>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Selector {
    pub strategy: Strategy,
    pub value: String,
}

impl Selector {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    pub fn class(value: impl Into<String>) -> Self {
        Self::new(Strategy::Class, value)
    }

    pub fn position(value: impl Into<String>) -> Self {
        Self::new(Strategy::Position, value)
    }

    /// The replay form, e.g. `css:[name="q"]`.
    pub fn locator(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy.locator_prefix(), self.value)
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, value) = s
            .split_once(':')
            .ok_or_else(|| SelectorParseError::MissingPrefix(s.to_string()))?;

        let strategy = match prefix {
            "id" => Strategy::Id,
            "css" if is_sibling_position(value) => Strategy::Position,
            "css" => Strategy::Css,
            "xpath" => Strategy::XPath,
            "class" => Strategy::Class,
            other => return Err(SelectorParseError::UnknownStrategy(other.to_string())),
        };

        Ok(Selector::new(strategy, value))
    }
}

/// `<tag>:nth-child(<n>)` with nothing else around it.
fn is_sibling_position(value: &str) -> bool {
    let Some((tag, rest)) = value.split_once(":nth-child(") else {
        return false;
    };
    let Some(index) = rest.strip_suffix(')') else {
        return false;
    };
    !tag.is_empty()
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !index.is_empty()
        && index.chars().all(|c| c.is_ascii_digit())
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_renders_as_css() {
        let sel = Selector::position("input:nth-child(2)");
        assert_eq!(sel.to_string(), "css:input:nth-child(2)");
    }

    #[test]
    fn position_survives_a_save_and_load() {
        let saved = serde_json::to_string(&Selector::position("li:nth-child(3)")).unwrap();
        let loaded: Selector = serde_json::from_str(&saved).unwrap();
        assert_eq!(loaded, Selector::position("li:nth-child(3)"));
        assert_eq!(loaded.strategy, Strategy::Position);
    }

    #[test]
    fn other_css_stays_css() {
        for value in [
            "input[name=\"q\"]",
            "ul > li:nth-child(2)",
            "li:nth-child(2n)",
            "li:nth-child(2).active",
        ] {
            let sel: Selector = format!("css:{}", value).parse().unwrap();
            assert_eq!(sel.strategy, Strategy::Css, "{}", value);
            assert_eq!(sel.value, value);
        }
    }

    #[test]
    fn parse_keeps_colons_in_value() {
        let sel: Selector = "xpath://a[contains(text(),\"a:b\")]".parse().unwrap();
        assert_eq!(sel.strategy, Strategy::XPath);
        assert_eq!(sel.value, "//a[contains(text(),\"a:b\")]");
    }

    #[test]
    fn parse_rejects_unknown_prefix() {
        assert_eq!(
            "name:q".parse::<Selector>(),
            Err(SelectorParseError::UnknownStrategy("name".into()))
        );
        assert!(matches!(
            "plain".parse::<Selector>(),
            Err(SelectorParseError::MissingPrefix(_))
        ));
    }

    #[test]
    fn serializes_as_locator_string() {
        let json = serde_json::to_string(&Selector::css("[name=\"submit\"]")).unwrap();
        assert_eq!(json, r#""css:[name=\"submit\"]""#);
    }
}
