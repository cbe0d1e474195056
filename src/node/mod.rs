//! Author-level node types.
//!
//! `Node` is the tree callers build (through [`build`](crate::build::build),
//! [`h!`](crate::h) or the element builder). It is turned into a virtual
//! snapshot ([`VNode`](crate::vnode::VNode)) before anything reaches the
//! output medium; components collapse out of the snapshot.

mod component;
mod element;
mod text;

pub use component::{Component, ComponentRef, Scope, StateHandle};
pub use element::Element;
pub use text::{TEXT_TYPE, Text};

pub(crate) use component::Binding;

use smallvec::SmallVec;

/// Node in an author-level tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
    Component(ComponentRef),
}

impl Node {
    // Generates for each variant (element -> Element, etc.):
    //   - is_xxx(&self) -> bool
    //   - as_xxx(&self) -> Option<&Type>
    //   - as_xxx_mut(&mut self) -> Option<&mut Type>
    impl_enum_accessors!(; element, text);

    /// Check if this is a Component node
    pub fn is_component(&self) -> bool {
        matches!(self, Node::Component(_))
    }

    /// Try to get as component reference
    pub fn as_component(&self) -> Option<&ComponentRef> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text::new(content))
    }

    /// Create a component node from a component value.
    pub fn component<C: Component>(component: C) -> Self {
        Node::Component(ComponentRef::new(component))
    }

    /// Node type: the tag for elements, [`TEXT_TYPE`] for text, `None` for
    /// components (their identity is the instance).
    pub fn node_type(&self) -> Option<&str> {
        match self {
            Node::Element(e) => Some(&e.tag),
            Node::Text(_) => Some(TEXT_TYPE),
            Node::Component(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(Box::new(element))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<ComponentRef> for Node {
    fn from(component: ComponentRef) -> Self {
        Node::Component(component)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;
