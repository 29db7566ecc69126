//! Identifier types.
//!
//! Cars are named by the caller (`"A"`, `"truck-7"`, …) so `CarId` wraps a
//! shared string: cloning it is a reference-count bump, which matters because
//! the id is copied into the grid, the registry, and every pending request.
//!
//! Internally generated ids (request tickets) are zero-cost integer wrappers.

use std::fmt;
use std::sync::Arc;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The id following `self` in issue order.
            #[inline(always)]
            pub fn next(self) -> Self {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of one blocked request.  Issued in strictly increasing order,
    /// so comparing two tickets compares arrival order.
    pub struct Ticket(u64);
}

// ── CarId ─────────────────────────────────────────────────────────────────────

/// Caller-chosen car identifier, unique while the car is on the road.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(Arc<str>);

impl CarId {
    pub fn new(name: impl AsRef<str>) -> Self {
        CarId(Arc::from(name.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CarId {
    fn from(name: &str) -> Self {
        CarId(Arc::from(name))
    }
}

impl From<String> for CarId {
    fn from(name: String) -> Self {
        CarId(Arc::from(name))
    }
}

impl From<&CarId> for CarId {
    fn from(id: &CarId) -> Self {
        id.clone()
    }
}

impl fmt::Debug for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarId({:?})", &*self.0)
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CarId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CarId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize>::deserialize(deserializer).map(CarId::from)
    }
}
