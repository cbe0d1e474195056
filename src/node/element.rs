//! Element type - container nodes with props and children
//!
//! The author-level building block of a tree. Its shape (tag, children) is
//! fixed once built; props may still be set through the factory protocol.

use crate::attr::{PropKey, PropValue, Props, PropsExt, Tag};

use super::{Children, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// Element with a tag, props and child nodes
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Tag name
    pub tag: Tag,
    /// Props in insertion order
    pub props: Props,
    /// Child nodes, already flattened
    pub children: Children,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Factory protocol
    // ─────────────────────────────────────────────────────────────────────────

    /// Set a prop (factory `setAttribute`)
    pub fn set_attribute(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) {
        self.props.set_prop(name, value);
    }

    /// Append a child node (factory `appendChild`)
    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a prop.
    pub fn prop(mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set the `className` prop.
    pub fn with_class(self, class: &str) -> Self {
        self.prop("className", class)
    }

    /// Add any node as a child.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.append_child(child.into());
        self
    }

    /// Add a text child.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.append_child(Node::Text(Text::new(content)));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a prop by name
    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get_prop(name)
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = Element::new("div")
            .with_class("container")
            .prop("id", "main")
            .child(Element::new("span"))
            .text("Hello");

        assert_eq!(elem.tag, "div");
        assert_eq!(elem.get_prop("className"), Some(&PropValue::from("container")));
        assert_eq!(elem.child_count(), 2);
        assert!(elem.children[0].is_element());
        assert!(elem.children[1].is_text());
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut elem = Element::new("input");
        elem.set_attribute("value", "a");
        elem.set_attribute("value", "b");
        assert_eq!(elem.props.len(), 1);
        assert_eq!(elem.get_prop("value").and_then(PropValue::as_str), Some("b"));
    }
}
