//! Host node identity.
//!
//! The core never holds references into the output medium. Every real node
//! is named by a `HostId` handed out by the [`Host`](crate::host::Host) that
//! created it, and anchors are expressed in terms of these ids.

use std::fmt;

/// Identifier of a node living in the output medium.
///
/// # Memory Layout
///
/// - 8 bytes (u64)
/// - Copy, no heap allocation
/// - Arena hosts pack a slot index in the low 32 bits and the slot's
///   generation in the high 32 bits, so a reused slot never repeats an id
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct HostId(pub(crate) u64);

impl HostId {
    /// Create a HostId from a raw u64 value.
    ///
    /// Hosts use this to mint ids for the nodes they create.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 representation
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Id of arena slot `index` at `generation`.
    #[inline]
    pub(crate) const fn from_parts(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | index as u64)
    }

    /// Arena slot index, `None` if it does not fit the platform's `usize`.
    #[inline]
    pub(crate) fn index(&self) -> Option<usize> {
        usize::try_from(self.0 & u64::from(u32::MAX)).ok()
    }

    /// Arena slot generation.
    #[inline]
    pub(crate) const fn generation(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Return the id serialized for use in debug attributes.
    #[inline]
    pub fn to_attr_value(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Debug for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostId({})", self.0)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation() {
            0 => write!(f, "#{}", self.0),
            generation => write!(f, "#{}v{}", self.0 & u64::from(u32::MAX), generation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_id_roundtrip() {
        let id = HostId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), Some(42));
        assert_eq!(id.generation(), 0);
        assert_eq!(id.to_attr_value(), "42");
        assert_eq!(format!("{id}"), "#42");
        assert_eq!(format!("{id:?}"), "HostId(42)");
    }

    #[test]
    fn test_host_id_parts() {
        let id = HostId::from_parts(3, 2);
        assert_eq!(id.index(), Some(3));
        assert_eq!(id.generation(), 2);
        assert_ne!(id, HostId::from_parts(3, 1));
        assert_eq!(format!("{id}"), "#3v2");

        let top = HostId::from_raw(u64::MAX);
        assert_eq!(top.index(), Some(u32::MAX as usize));
        assert_eq!(top.generation(), u32::MAX);
    }

    #[test]
    fn test_host_id_size() {
        assert_eq!(std::mem::size_of::<HostId>(), 8);
    }
}
