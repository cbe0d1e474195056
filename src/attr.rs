//! Prop system for VDOM nodes
//!
//! Props are stored as an ordered `Vec<(PropKey, PropValue)>`: order is the
//! emission order when a node is materialized and is ignored when diffing.
//!
//! Two naming conventions are applied when props reach the host:
//! - `on<Event>` (an uppercase letter right after `on`) binds a listener for
//!   the lowercased event name instead of setting an attribute
//! - `className` is emitted as the native `class` attribute

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;

use crate::id::HostId;

/// Prop name
pub type PropKey = CompactString;

/// Element tag name
pub type Tag = CompactString;

/// Node props as simple ordered key-value pairs
pub type Props = Vec<(PropKey, PropValue)>;

// =============================================================================
// Events and callbacks
// =============================================================================

/// Event delivered to a listener by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Lowercased event name, e.g. `click`
    pub name: CompactString,
    /// Host node the listener was registered on
    pub target: HostId,
}

impl Event {
    /// Create a new event.
    pub fn new(name: impl Into<CompactString>, target: HostId) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

/// Shared event handler.
///
/// Equality is identity: two callbacks are equal only if they are clones of
/// the same handler.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&Event)>);

impl Callback {
    /// Wrap a closure as a callback.
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

/// Opaque shared value, compared by reference.
///
/// Used to hand nested objects to components without deep comparison.
#[derive(Clone)]
pub struct SharedValue(Rc<dyn Any>);

impl SharedValue {
    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Downcast to the wrapped type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedValue({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// Value of a single prop.
///
/// Equality is shallow: scalars by value, callbacks and shared values by
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(CompactString),
    Int(i64),
    Float(f64),
    Bool(bool),
    Callback(Callback),
    Shared(SharedValue),
}

impl PropValue {
    /// Attribute text for this value, `None` for values that have no
    /// attribute form (callbacks, shared values).
    pub fn to_attr_value(&self) -> Option<CompactString> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(n) => Some(CompactString::from(n.to_string())),
            Self::Float(n) => Some(CompactString::from(n.to_string())),
            Self::Bool(b) => Some(CompactString::from(if *b { "true" } else { "false" })),
            Self::Callback(_) | Self::Shared(_) => None,
        }
    }

    /// Get as string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as callback if this is a callback value.
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Self::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<CompactString> for PropValue {
    fn from(s: CompactString) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Callback> for PropValue {
    fn from(cb: Callback) -> Self {
        Self::Callback(cb)
    }
}

impl From<SharedValue> for PropValue {
    fn from(v: SharedValue) -> Self {
        Self::Shared(v)
    }
}

// =============================================================================
// Naming conventions
// =============================================================================

/// How a prop is applied to a real node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropTarget<'a> {
    /// Bind as a listener for this event
    Listener(CompactString),
    /// Set as an attribute with this name
    Attribute(&'a str),
}

/// Classify a prop name.
///
/// ```
/// use anchor_vdom::attr::{classify_prop, PropTarget};
///
/// assert_eq!(classify_prop("onClick"), PropTarget::Listener("click".into()));
/// assert_eq!(classify_prop("className"), PropTarget::Attribute("class"));
/// assert_eq!(classify_prop("once"), PropTarget::Attribute("once"));
/// ```
pub fn classify_prop(name: &str) -> PropTarget<'_> {
    match event_name(name) {
        Some(event) => PropTarget::Listener(event),
        None => PropTarget::Attribute(attr_name(name)),
    }
}

/// Event name for an `on<Event>` prop.
pub fn event_name(name: &str) -> Option<CompactString> {
    let rest = name.strip_prefix("on")?;
    if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    Some(CompactString::from(rest.to_ascii_lowercase()))
}

/// Native attribute name for a prop.
pub fn attr_name(name: &str) -> &str {
    match name {
        "className" => "class",
        other => other,
    }
}

// =============================================================================
// Props operations
// =============================================================================

/// Extension trait for prop operations on Props
pub trait PropsExt {
    /// Get a prop value by name
    fn get_prop(&self, name: &str) -> Option<&PropValue>;

    /// Check if a prop exists
    fn has_prop(&self, name: &str) -> bool;

    /// Set a prop value (insert or update, keeping first insertion order)
    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>);

    /// Remove a prop by name, returning the old value if present
    fn remove_prop(&mut self, name: &str) -> Option<PropValue>;
}

impl PropsExt for Props {
    fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_prop(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(prop) = self.iter_mut().find(|(k, _)| *k == name) {
            prop.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_prop(&mut self, name: &str) -> Option<PropValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

/// Shallow prop equality used by the same-node test.
///
/// Every prop of `new` must have an equal value on `old`, and `old` must not
/// carry more props than `new`. Since prop names are unique, this is exact
/// key/value set equality regardless of order.
pub fn props_match(old: &Props, new: &Props) -> bool {
    old.len() <= new.len()
        && new
            .iter()
            .all(|(name, value)| old.get_prop(name) == Some(value))
}

/// Validate a prop at the construction boundary.
///
/// Event props must carry callbacks, and callbacks must sit under event
/// props.
pub fn validate_prop(name: &str, value: &PropValue) -> crate::VdomResult<()> {
    match (event_name(name).is_some(), value.is_callback()) {
        (true, false) => Err(crate::VdomError::invalid_prop(
            name,
            "event props expect a callback",
        )),
        (false, true) => Err(crate::VdomError::invalid_prop(
            name,
            "callbacks must use an `on<Event>` name",
        )),
        _ => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_props_operations() {
        let mut props: Props = Vec::new();

        props.set_prop("id", "main");
        props.set_prop("className", "container");
        assert_eq!(props.len(), 2);

        assert_eq!(props.get_prop("id").and_then(PropValue::as_str), Some("main"));
        assert!(props.has_prop("className"));
        assert!(!props.has_prop("href"));

        // Update keeps position
        props.set_prop("id", "other");
        assert_eq!(props[0].0, "id");
        assert_eq!(props.get_prop("id").and_then(PropValue::as_str), Some("other"));

        let removed = props.remove_prop("id");
        assert_eq!(removed, Some(PropValue::from("other")));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_event_name_convention() {
        assert_eq!(event_name("onClick").as_deref(), Some("click"));
        assert_eq!(event_name("onMouseDown").as_deref(), Some("mousedown"));
        assert_eq!(event_name("on"), None);
        assert_eq!(event_name("one"), None);
        assert_eq!(event_name("click"), None);
    }

    #[test]
    fn test_attr_name_remaps_class_name() {
        assert_eq!(attr_name("className"), "class");
        assert_eq!(attr_name("id"), "id");
        assert_eq!(classify_prop("data-x"), PropTarget::Attribute("data-x"));
    }

    #[test]
    fn test_attr_value_forms() {
        assert_eq!(PropValue::from(3).to_attr_value().as_deref(), Some("3"));
        assert_eq!(PropValue::from(1.5).to_attr_value().as_deref(), Some("1.5"));
        assert_eq!(PropValue::from(true).to_attr_value().as_deref(), Some("true"));
        assert_eq!(PropValue::from(Callback::new(|_| {})).to_attr_value(), None);
    }

    #[test]
    fn test_callback_identity_equality() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let a = Callback::new(move |_| counter.set(counter.get() + 1));
        let b = a.clone();
        let c = Callback::new(|_| {});

        assert_eq!(a, b);
        assert_ne!(a, c);

        b.call(&Event::new("click", HostId::from_raw(0)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_shared_value_compares_by_reference() {
        let a = SharedValue::new(vec![1, 2, 3]);
        let b = SharedValue::new(vec![1, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_props_match_is_order_insensitive() {
        let old: Props = vec![("a".into(), 1.into()), ("b".into(), "x".into())];
        let new: Props = vec![("b".into(), "x".into()), ("a".into(), 1.into())];
        assert!(props_match(&old, &new));
    }

    #[test]
    fn test_props_match_rejects_dropped_and_changed_props() {
        let old: Props = vec![("a".into(), 1.into()), ("b".into(), 2.into())];
        let dropped: Props = vec![("a".into(), 1.into())];
        let changed: Props = vec![("a".into(), 1.into()), ("b".into(), 3.into())];
        let added: Props = vec![
            ("a".into(), 1.into()),
            ("b".into(), 2.into()),
            ("c".into(), 3.into()),
        ];

        assert!(!props_match(&old, &dropped));
        assert!(!props_match(&old, &changed));
        assert!(!props_match(&old, &added));
    }

    #[test]
    fn test_validate_prop() {
        let cb = PropValue::from(Callback::new(|_| {}));
        assert!(validate_prop("onClick", &cb).is_ok());
        assert!(validate_prop("id", &PropValue::from("x")).is_ok());
        assert!(matches!(
            validate_prop("onClick", &PropValue::from("alert()")),
            Err(crate::VdomError::InvalidProp { .. })
        ));
        assert!(matches!(
            validate_prop("handler", &cb),
            Err(crate::VdomError::InvalidProp { .. })
        ));
    }
}
