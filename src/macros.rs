//! Accessor and tree-construction macros
//!
//! Accessor macros use `paste` internally for identifier concatenation.

// =============================================================================
// Enum accessor generation
// =============================================================================

/// Generate is_xxx, as_xxx, as_xxx_mut methods for node enums
///
/// Each listed variant name is lowercase; the variant and its payload type
/// share the camel-cased name, with `$prefix` prepended to the payload type.
/// The empty-prefix form is spelled with a leading `;`.
///
/// # Example
/// ```ignore
/// impl Node {
///     impl_enum_accessors!(; element, text);
/// }
/// impl VNode {
///     impl_enum_accessors!(V; element, text);
/// }
/// ```
#[macro_export]
macro_rules! impl_enum_accessors {
    (; $($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " [<$variant:camel>] " node"]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get as " $variant " reference"]
                pub fn [<as_ $variant>](&self) -> Option<&[<$variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }

                #[doc = "Try to get as mutable " $variant " reference"]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut [<$variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }
            )*
        }
    };
    ($prefix:ident; $($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " [<$variant:camel>] " node"]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get as " $variant " reference"]
                pub fn [<as_ $variant>](&self) -> Option<&[<$prefix $variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }

                #[doc = "Try to get as mutable " $variant " reference"]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut [<$prefix $variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }
            )*
        }
    };
}

// =============================================================================
// Tree construction
// =============================================================================

/// Build a node through [`build`](crate::build::build).
///
/// Expands to a `VdomResult<Node>`. Props are `name => value` pairs, children
/// anything convertible into [`Child`](crate::build::Child).
///
/// # Example
/// ```
/// use anchor_vdom::h;
///
/// let node = h!("ul", { "className" => "list" }, [
///     h!("li", {}, ["one"])?,
///     h!("li", {}, ["two"])?,
/// ])?;
/// assert_eq!(node.as_element().map(|e| e.children.len()), Some(2));
/// # Ok::<(), anchor_vdom::VdomError>(())
/// ```
#[macro_export]
macro_rules! h {
    ($ty:expr) => {
        $crate::h!($ty, {}, [])
    };
    ($ty:expr, { $($name:expr => $value:expr),* $(,)? }) => {
        $crate::h!($ty, { $($name => $value),* }, [])
    };
    ($ty:expr, { $($name:expr => $value:expr),* $(,)? }, [ $($child:expr),* $(,)? ]) => {{
        let props: ::std::vec::Vec<(&str, $crate::attr::PropValue)> =
            ::std::vec![$(($name, $crate::attr::PropValue::from($value))),*];
        let children: ::std::vec::Vec<$crate::build::Child> =
            ::std::vec![$($crate::build::Child::from($child)),*];
        $crate::build::build($ty, props, children)
    }};
}
