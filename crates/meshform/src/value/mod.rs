//! Configuration-side values.
//!
//! Every attribute of the declarative model is in one of three states: known (set to a
//! concrete value), null (explicitly absent) or unknown (not determined until apply, for
//! example a computed identifier before the first create). Collections additionally keep
//! "null" (attribute unset) apart from "known but empty".
//!
//! Values produced by decoding a remote response are never [`Value::Unknown`]; that state only
//! originates in the configuration layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::Error as _};

pub mod merge;

/// A three-valued scalar attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value<T> {
    /// The attribute is set to a concrete value.
    Known(T),

    /// The attribute is explicitly absent.
    Null,

    /// The attribute will only be determined later (for example during apply).
    Unknown,
}

impl<T> Value<T> {
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns a reference to the contained value if it is known.
    pub const fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Consumes the value, returning the contained value if it is known.
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Maps a known value, leaving null and unknown untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Value<U> {
        match self {
            Self::Known(value) => Value::Known(f(value)),
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
        }
    }
}

// Written out so that null is the default without requiring `T: Default`.
impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => serializer.serialize_some(value),
            Self::Null => serializer.serialize_none(),
            Self::Unknown => Err(S::Error::custom(
                "an unknown value cannot be serialized",
            )),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// An ordered collection attribute. Equality is positional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListValue<T> {
    /// The attribute is entirely unset.
    Null,

    /// The attribute will only be determined later.
    Unknown,

    /// The attribute is set, possibly to zero elements.
    Known(Vec<T>),
}

impl<T> ListValue<T> {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_known(&self) -> Option<&[T]> {
        match self {
            Self::Known(elements) => Some(elements),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Whether the list is known and contains at least one element.
    pub fn is_populated(&self) -> bool {
        self.as_known().is_some_and(|elements| !elements.is_empty())
    }
}

impl<T> Default for ListValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<Vec<T>>> for ListValue<T> {
    fn from(value: Option<Vec<T>>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T> FromIterator<T> for ListValue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Known(iter.into_iter().collect())
    }
}

/// An unordered membership attribute (for example a set of group identifiers).
///
/// Elements are kept sorted and deduplicated, so two sets holding the same members compare
/// equal regardless of the order they were read in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SetValue<T: Ord> {
    /// The attribute is entirely unset.
    Null,

    /// The attribute will only be determined later.
    Unknown,

    /// The attribute is set, possibly to zero members.
    Known(BTreeSet<T>),
}

impl<T: Ord> SetValue<T> {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub const fn as_known(&self) -> Option<&BTreeSet<T>> {
        match self {
            Self::Known(members) => Some(members),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Whether the set is known and contains at least one member.
    pub fn is_populated(&self) -> bool {
        self.as_known().is_some_and(|members| !members.is_empty())
    }
}

impl<T: Ord> Default for SetValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T: Ord> FromIterator<T> for SetValue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Known(iter.into_iter().collect())
    }
}
