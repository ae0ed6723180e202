//! Picks exactly one remote entity out of a listed collection using a sparse set of criteria.
//!
//! Every populated criterion that equals the corresponding entity field adds one to the
//! entity's score, and every entity with a score above zero is a candidate. Criteria left
//! unset never disqualify an entity, so multi-field selectors combine with OR semantics.
//! Resolution succeeds only with exactly one candidate: there is no best-match fallback, even
//! when one candidate scores strictly higher than another.
use std::{
    borrow::Borrow,
    fmt::{self, Debug, Display},
};

use snafu::{Snafu, ensure};

use crate::value::Value;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("no {kind} selector is set, at least one of {fields:?} must be given"))]
    NoSelector {
        kind: &'static str,
        fields: Vec<&'static str>,
    },

    #[snafu(display("no {kind} matches the selector {selector}"))]
    NotFound { kind: &'static str, selector: String },

    #[snafu(display(
        "the selector {selector} matches {count} {kind} entities, but must match exactly one"
    ))]
    MultipleMatches {
        kind: &'static str,
        selector: String,
        count: usize,
    },
}

struct Criterion<'a, E> {
    name: &'static str,
    value: String,
    matches: Box<dyn Fn(&E) -> bool + 'a>,
}

/// The populated criteria of a selector over entities of type `E`.
///
/// Built with [`Criteria::field`] and [`Criteria::list_field`]. All declared field names are
/// remembered for error reporting, but only [`Value::Known`] values become criteria.
pub struct Criteria<'a, E> {
    kind: &'static str,
    fields: Vec<&'static str>,
    criteria: Vec<Criterion<'a, E>>,
}

impl<'a, E> Criteria<'a, E> {
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            criteria: Vec::new(),
        }
    }

    /// Matches entities whose field (as returned by `accessor`) equals `value`.
    pub fn field<V, F>(mut self, name: &'static str, value: &'a Value<V>, accessor: F) -> Self
    where
        V: PartialEq + Debug,
        F: Fn(&E) -> Option<&V> + 'a,
    {
        self.fields.push(name);
        if let Value::Known(value) = value {
            self.criteria.push(Criterion {
                name,
                value: format!("{value:?}"),
                matches: Box::new(move |entity: &E| accessor(entity) == Some(value)),
            });
        }
        self
    }

    /// Matches entities whose collection field (as returned by `accessor`) contains `value`.
    pub fn list_field<V, F>(mut self, name: &'static str, value: &'a Value<V>, accessor: F) -> Self
    where
        V: PartialEq + Debug,
        F: Fn(&E) -> Option<&[V]> + 'a,
    {
        self.fields.push(name);
        if let Value::Known(value) = value {
            self.criteria.push(Criterion {
                name,
                value: format!("{value:?}"),
                matches: Box::new(move |entity: &E| {
                    accessor(entity).is_some_and(|elements| elements.contains(value))
                }),
            });
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Fails with [`Error::NoSelector`] if no criterion is populated.
    pub fn check_populated(&self) -> Result<()> {
        ensure!(!self.is_empty(), NoSelectorSnafu {
            kind: self.kind,
            fields: self.fields.clone(),
        });
        Ok(())
    }

    /// The number of populated criteria the entity matches.
    pub fn score(&self, entity: &E) -> usize {
        self.criteria
            .iter()
            .filter(|criterion| (criterion.matches)(entity))
            .count()
    }
}

impl<E> Display for Criteria<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, criterion) in self.criteria.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", criterion.name, criterion.value)?;
        }
        f.write_str("}")
    }
}

/// Resolves the single entity of `collection` matched by `criteria`.
///
/// The criteria are checked for emptiness before the collection is touched.
pub fn resolve<E, I>(collection: I, criteria: &Criteria<'_, E>) -> Result<I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<E>,
{
    criteria.check_populated()?;

    let mut candidates: Vec<I::Item> = collection
        .into_iter()
        .filter(|entity| criteria.score(<I::Item as Borrow<E>>::borrow(entity)) > 0)
        .collect();

    tracing::debug!(
        selector.kind = criteria.kind(),
        selector.criteria = %criteria,
        selector.candidates = candidates.len(),
        "resolved selector against collection"
    );

    ensure!(candidates.len() <= 1, MultipleMatchesSnafu {
        kind: criteria.kind(),
        selector: criteria.to_string(),
        count: candidates.len(),
    });

    candidates.pop().ok_or_else(|| Error::NotFound {
        kind: criteria.kind(),
        selector: criteria.to_string(),
    })
}

/// A data-source filter that identifies one entity of type [`Selector::Entity`].
pub trait Selector {
    type Entity;

    /// Human-readable entity kind used in error messages, such as `"group"`.
    const KIND: &'static str;

    fn criteria(&self) -> Criteria<'_, Self::Entity>;

    fn resolve<I>(&self, collection: I) -> Result<I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<Self::Entity>,
    {
        resolve(collection, &self.criteria())
    }
}
