//! HTML Rendering
//!
//! Serializes host subtrees of a [`Document`] and virtual snapshots to HTML
//! strings. Both forms emit props the way binding applies them, so the HTML
//! of a mounted container matches the HTML of the snapshot mounted into it.

use crate::attr::{PropTarget, classify_prop};
use crate::host::{DomData, Document};
use crate::id::HostId;
use crate::vnode::VNode;

// =============================================================================
// RenderConfig
// =============================================================================

/// Default attribute name for host node ids.
pub const DEFAULT_ID_ATTR: &str = "data-host-id";

/// Configuration for HTML rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to emit host node ids on elements.
    pub emit_ids: bool,
    /// Attribute name for host ids (default: "data-host-id").
    pub id_attr_name: String,
}

impl RenderConfig {
    /// Development config (emit ids).
    pub const DEV: Self = Self {
        emit_ids: true,
        id_attr_name: String::new(), // Will use DEFAULT_ID_ATTR
    };

    /// Production config (no ids).
    pub const PROD: Self = Self {
        emit_ids: false,
        id_attr_name: String::new(),
    };

    /// Create a new config.
    pub fn new(emit_ids: bool) -> Self {
        Self {
            emit_ids,
            id_attr_name: DEFAULT_ID_ATTR.to_string(),
        }
    }

    /// Set custom attribute name for host ids.
    pub fn with_id_attr(mut self, attr_name: impl Into<String>) -> Self {
        self.id_attr_name = attr_name.into();
        self
    }

    /// Get the attribute name for host ids.
    pub fn id_attr(&self) -> &str {
        if self.id_attr_name.is_empty() {
            DEFAULT_ID_ATTR
        } else {
            &self.id_attr_name
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

// =============================================================================
// Host Rendering
// =============================================================================

/// Render a host node and its subtree to HTML.
///
/// Unknown ids render as the empty string.
pub fn render_html(doc: &Document, node: HostId, config: &RenderConfig) -> String {
    let mut output = String::new();
    render_host_node(doc, node, config, &mut output);
    output
}

/// Render the children of a host node to HTML.
pub fn inner_html(doc: &Document, container: HostId, config: &RenderConfig) -> String {
    let mut output = String::new();
    for child in doc.children(container) {
        render_host_node(doc, *child, config, &mut output);
    }
    output
}

fn render_host_node(doc: &Document, id: HostId, config: &RenderConfig, output: &mut String) {
    let Some(node) = doc.node(id) else { return };
    match &node.data {
        DomData::Element { tag, attrs, .. } => {
            output.push('<');
            output.push_str(tag);
            for (name, value) in attrs {
                push_attr(output, name, value);
            }
            if config.emit_ids {
                push_attr(output, config.id_attr(), &id.to_attr_value());
            }
            if is_void_element(tag) {
                output.push_str(" />");
                return;
            }
            output.push('>');
            for child in node.children() {
                render_host_node(doc, *child, config, output);
            }
            push_close(output, tag);
        }
        DomData::Text(content) => output.push_str(&escape_html(content)),
    }
}

// =============================================================================
// Snapshot Rendering
// =============================================================================

/// Render a virtual snapshot to HTML, applying props as binding would.
pub fn render_vnode(vnode: &VNode) -> String {
    let mut output = String::new();
    render_vnode_into(vnode, &mut output);
    output
}

fn render_vnode_into(vnode: &VNode, output: &mut String) {
    match vnode {
        VNode::Element(elem) => {
            output.push('<');
            output.push_str(&elem.tag);
            for (name, value) in &elem.props {
                if let PropTarget::Attribute(attr) = classify_prop(name)
                    && let Some(value) = value.to_attr_value()
                {
                    push_attr(output, attr, &value);
                }
            }
            if is_void_element(&elem.tag) {
                output.push_str(" />");
                return;
            }
            output.push('>');
            for child in &elem.children {
                render_vnode_into(child, output);
            }
            push_close(output, &elem.tag);
        }
        VNode::Text(text) => output.push_str(&escape_html(&text.content)),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn push_attr(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape_attr(value));
    output.push('"');
}

fn push_close(output: &mut String, tag: &str) {
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
