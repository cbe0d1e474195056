//! Tree construction factory.
//!
//! [`build`] is the single entry point the [`h!`](crate::h) macro expands to.
//! Props go through `set_attribute` and children through `append_child` on
//! the element or component instance being built.

use crate::attr::{PropKey, PropValue, Tag, validate_prop};
use crate::error::VdomResult;
use crate::node::{Component, ComponentRef, Element, Node, Text};

// =============================================================================
// Node type
// =============================================================================

/// What [`build`] constructs: an element tag or a component.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// Element with this tag
    Tag(Tag),
    /// Component created fresh by this constructor on every build
    Component(fn() -> ComponentRef),
}

impl NodeType {
    /// Component type for `C`.
    pub fn component<C: Component + Default>() -> Self {
        NodeType::Component(new_instance::<C>)
    }
}

fn new_instance<C: Component + Default>() -> ComponentRef {
    ComponentRef::new(C::default())
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::Tag(Tag::from(tag))
    }
}

impl From<Tag> for NodeType {
    fn from(tag: Tag) -> Self {
        NodeType::Tag(tag)
    }
}

/// Shorthand for [`NodeType::component`].
pub fn component<C: Component + Default>() -> NodeType {
    NodeType::component::<C>()
}

// =============================================================================
// Children
// =============================================================================

/// A child as accepted by [`build`], before flattening.
#[derive(Debug, Clone)]
pub enum Child {
    Node(Node),
    /// Wrapped as a text node
    Text(String),
    /// Flattened recursively
    List(Vec<Child>),
    /// Dropped
    None,
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Node(element.into())
    }
}

impl From<Text> for Child {
    fn from(text: Text) -> Self {
        Child::Node(text.into())
    }
}

impl From<ComponentRef> for Child {
    fn from(component: ComponentRef) -> Self {
        Child::Node(component.into())
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Text(s.to_string())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Text(s)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        item.map_or(Child::None, Into::into)
    }
}

fn flatten_into(child: Child, out: &mut Vec<Node>) {
    match child {
        Child::Node(node) => out.push(node),
        Child::Text(content) => out.push(Node::text(content)),
        Child::List(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Child::None => {}
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Build a node from a type, attributes and children.
///
/// Every attribute is validated before anything is built: `on<Event>` names
/// must carry a callback and callbacks must use an `on<Event>` name.
///
/// ```
/// use anchor_vdom::build::{build, Child};
/// use anchor_vdom::attr::PropValue;
///
/// let node = build(
///     "p",
///     [("className", PropValue::from("note"))],
///     [Child::from("a"), Child::from(vec!["b", "c"]), Child::None],
/// )
/// .unwrap();
/// assert_eq!(node.as_element().map(|e| e.children.len()), Some(3));
/// ```
pub fn build<K, A, C>(ty: impl Into<NodeType>, attrs: A, children: C) -> VdomResult<Node>
where
    K: Into<PropKey>,
    A: IntoIterator<Item = (K, PropValue)>,
    C: IntoIterator<Item = Child>,
{
    let attrs = attrs
        .into_iter()
        .map(|(name, value)| {
            let name: PropKey = name.into();
            validate_prop(&name, &value).map(|()| (name, value))
        })
        .collect::<VdomResult<Vec<_>>>()?;

    let mut nodes = Vec::new();
    for child in children {
        flatten_into(child, &mut nodes);
    }

    match ty.into() {
        NodeType::Tag(tag) => {
            let mut element = Element::new(tag);
            for (name, value) in attrs {
                element.set_attribute(name, value);
            }
            for node in nodes {
                element.append_child(node);
            }
            Ok(element.into())
        }
        NodeType::Component(construct) => {
            let instance = construct();
            for (name, value) in attrs {
                instance.set_attribute(name, value)?;
            }
            for node in nodes {
                instance.append_child(node)?;
            }
            Ok(instance.into())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Callback;
    use crate::error::VdomError;
    use crate::node::Scope;

    #[derive(Default)]
    struct Badge;

    impl Component for Badge {
        fn render(&self, scope: &Scope<'_>) -> Node {
            let label = scope.prop("label").and_then(PropValue::as_str).unwrap_or("");
            Element::new("span").text(label).into()
        }
    }

    fn texts(node: &Node) -> Vec<String> {
        node.as_element()
            .map(|e| {
                e.children
                    .iter()
                    .filter_map(|c| c.as_text().map(|t| t.content.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_build_element_with_props() {
        let node = build("a", [("href", PropValue::from("/x")), ("tabIndex", PropValue::from(1i64))], []).unwrap();
        let element = node.as_element().unwrap();
        assert_eq!(element.tag, "a");
        assert_eq!(element.get_prop("href").and_then(PropValue::as_str), Some("/x"));
        assert_eq!(element.get_prop("tabIndex"), Some(&PropValue::Int(1)));
    }

    #[test]
    fn test_children_are_flattened() {
        let nested = Child::from(vec![Child::from("b"), Child::from(vec!["c", "d"])]);
        let node = build(
            "div",
            Vec::<(&str, PropValue)>::new(),
            [Child::from("a"), nested, Child::from(None::<&str>), Child::from(Some("e"))],
        )
        .unwrap();
        assert_eq!(texts(&node), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_build_component() {
        let node = build(component::<Badge>(), [("label", PropValue::from("new"))], [Child::from("x")]).unwrap();
        let instance = node.as_component().unwrap();
        assert_eq!(instance.prop_value("label").as_ref().and_then(PropValue::as_str), Some("new"));
        assert!(!instance.is_mounted());
    }

    #[test]
    fn test_each_build_creates_a_fresh_instance() {
        let a = build(component::<Badge>(), Vec::<(&str, PropValue)>::new(), []).unwrap();
        let b = build(component::<Badge>(), Vec::<(&str, PropValue)>::new(), []).unwrap();
        assert!(!a.as_component().unwrap().ptr_eq(b.as_component().unwrap()));
    }

    #[test]
    fn test_event_prop_requires_callback() {
        let err = build("button", [("onClick", PropValue::from("alert()"))], []).unwrap_err();
        assert!(matches!(err, VdomError::InvalidProp { ref name, .. } if name == "onClick"));
    }

    #[test]
    fn test_callback_requires_event_name() {
        let err = build("button", [("click", PropValue::from(Callback::new(|_| {})))], []).unwrap_err();
        assert!(matches!(err, VdomError::InvalidProp { ref name, .. } if name == "click"));
    }

    #[test]
    fn test_h_macro() {
        let node = crate::h!("ul", { "className" => "list" }, [
            crate::h!("li", {}, ["one"]).unwrap(),
            crate::h!("li").unwrap(),
            vec!["x", "y"],
        ])
        .unwrap();
        let ul = node.as_element().unwrap();
        assert_eq!(ul.get_prop("className").and_then(PropValue::as_str), Some("list"));
        assert_eq!(ul.child_count(), 4);
        assert_eq!(texts(&node), ["x", "y"]);
    }
}
