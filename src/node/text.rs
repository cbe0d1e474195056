//! Text leaf nodes.

use std::fmt;

/// Node type sentinel for text nodes.
pub const TEXT_TYPE: &str = "#text";

/// Plain text leaf. Its content takes part in the same-node test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub content: String,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<&str> for Text {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Text {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Text::from("a"), Text::new(String::from("a")));
        assert!(Text::default().is_empty());
        assert_eq!(Text::from("x < y").to_string(), "x < y");
    }
}
