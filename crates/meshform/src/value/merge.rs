//! Carrying prior state into a plan.
//!
//! Computed attributes (identifiers assigned by the remote system, for instance) are unknown in
//! a freshly read plan. When the prior state already knows them, they keep their prior value
//! instead of showing up as a pending change.

use super::{ListValue, SetValue, Value};

/// A type whose unknown parts can be filled in from a prior state.
///
/// # Example
///
/// ```
/// # use meshform::value::{Value, merge::Merge};
/// let mut planned = Value::<String>::Unknown;
/// planned.merge(&Value::Known("ch8i4ug6lnn4g9hqv7m0".to_owned()));
/// assert_eq!(planned, Value::Known("ch8i4ug6lnn4g9hqv7m0".to_owned()));
///
/// // Known and null values are never overridden.
/// let mut planned = Value::<String>::Null;
/// planned.merge(&Value::Known("ch8i4ug6lnn4g9hqv7m0".to_owned()));
/// assert_eq!(planned, Value::Null);
/// ```
pub trait Merge {
    /// Replaces unknown parts of `self` with the corresponding parts of `prior`.
    fn merge(&mut self, prior: &Self);
}

impl<T: Clone> Merge for Value<T> {
    fn merge(&mut self, prior: &Self) {
        if self.is_unknown() {
            self.clone_from(prior);
        }
    }
}

impl<T: Clone> Merge for ListValue<T> {
    fn merge(&mut self, prior: &Self) {
        if self.is_unknown() {
            self.clone_from(prior);
        }
    }
}

impl<T: Ord + Clone> Merge for SetValue<T> {
    fn merge(&mut self, prior: &Self) {
        if self.is_unknown() {
            self.clone_from(prior);
        }
    }
}

impl<T: Merge> Merge for Box<T> {
    fn merge(&mut self, prior: &Self) {
        T::merge(self, prior);
    }
}

/// Moving version of [`Merge::merge`], to produce slightly nicer test output
pub fn merge<T: Merge>(mut planned: T, prior: &T) -> T {
    planned.merge(prior);
    planned
}

/// Implements [`Merge`] for a configuration struct by merging every listed field.
macro_rules! impl_merge {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::value::merge::Merge for $ty {
            fn merge(&mut self, prior: &Self) {
                $($crate::value::merge::Merge::merge(&mut self.$field, &prior.$field);)*
            }
        }
    };
}

pub(crate) use impl_merge;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Planned {
        id: Value<String>,
        ports: ListValue<String>,
        peers: SetValue<String>,
    }

    impl_merge!(Planned { id, ports, peers });

    #[test]
    fn merge_fills_only_unknown_fields() {
        let planned = Planned {
            id: Value::Unknown,
            ports: ListValue::Known(vec!["80".to_owned()]),
            peers: SetValue::Unknown,
        };
        let prior = Planned {
            id: Value::Known("route-1".to_owned()),
            ports: ListValue::Known(vec!["443".to_owned()]),
            peers: SetValue::Null,
        };

        assert_eq!(
            merge(planned, &prior),
            Planned {
                id: Value::Known("route-1".to_owned()),
                ports: ListValue::Known(vec!["80".to_owned()]),
                peers: SetValue::Null,
            }
        );
    }

    #[test]
    fn merge_with_unknown_prior_stays_unknown() {
        let merged = merge(Value::<u8>::Unknown, &Value::Unknown);
        assert_eq!(merged, Value::Unknown);
    }
}
