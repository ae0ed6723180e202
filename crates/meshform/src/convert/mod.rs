//! Conversion between the remote API representation and configuration values.
//!
//! Decoding (`*_to_config`) never fails for scalars and collections: remote absence becomes
//! [`Value::Null`] / [`ListValue::Null`], remote presence becomes `Known`. Encoding
//! (`*_to_remote`) fails on unknown values, because those must be resolved before anything is
//! sent to the remote API.
//!
//! Null and empty collections are never interchangeable: a null collection encodes to [`None`]
//! and a known empty collection encodes to `Some(vec![])`, since the remote system may read
//! them as "no restriction" and "restricted to nothing" respectively.
use std::fmt::{Display, Write as _};

use snafu::Snafu;

use crate::value::{ListValue, SetValue, Value};

mod projection;

pub use projection::*;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Contains the path of the field currently being converted, used for error reporting.
///
/// Start with [`Field::root`] and descend with [`Field::field`].
#[derive(Clone, Copy)]
pub struct Field<'a> {
    ident: Option<&'a dyn Display>,
    parent: Option<&'a Field<'a>>,
}

impl Field<'static> {
    pub const fn root() -> Self {
        Self {
            ident: None,
            parent: None,
        }
    }
}

impl<'a> Field<'a> {
    /// Creates a `Field` for a subfield of the current object
    pub fn field<'b>(&'b self, ident: &'b dyn Display) -> Field<'b> {
        Field {
            ident: Some(ident),
            parent: Some(self),
        }
    }

    /// Resolves the full path from the root to this field.
    pub fn path(&self) -> FieldPath {
        let mut idents = Vec::new();
        let mut curr = Some(self);
        while let Some(curr_some) = curr {
            if let Some(ident) = curr_some.ident {
                idents.push(ident.to_string());
            }
            curr = curr_some.parent;
        }
        idents.reverse();
        FieldPath { idents }
    }

    pub fn error_unknown(&self) -> Error {
        Error::UnknownValue { field: self.path() }
    }

    pub fn error_null(&self) -> Error {
        Error::NullValue { field: self.path() }
    }

    pub fn error_shape(&self, reason: impl Into<String>) -> Error {
        Error::InvalidShape {
            field: self.path(),
            reason: reason.into(),
        }
    }
}

/// A dotted path to a field, such as `rules.0.sources`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    idents: Vec<String>,
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.idents.is_empty() {
            return f.write_str("<root>");
        }
        for (i, ident) in self.idents.iter().enumerate() {
            if i > 0 {
                f.write_char('.')?;
            }
            f.write_str(ident)?;
        }
        Ok(())
    }
}

/// An error that occurred when converting between the remote and the configuration model.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("{field}: value is not known yet and cannot be sent to the remote API"))]
    UnknownValue { field: FieldPath },

    #[snafu(display("{field}: value is required but null"))]
    NullValue { field: FieldPath },

    #[snafu(display("{field}: {reason}"))]
    InvalidShape { field: FieldPath, reason: String },

    #[snafu(display(
        "{field}: mutually exclusive variants {variants:?} are populated at the same time"
    ))]
    MultipleVariants {
        field: FieldPath,
        variants: Vec<&'static str>,
    },
}

impl Error {
    /// The path of the field the error occurred at.
    pub fn field(&self) -> &FieldPath {
        match self {
            Self::UnknownValue { field }
            | Self::NullValue { field }
            | Self::InvalidShape { field, .. }
            | Self::MultipleVariants { field, .. } => field,
        }
    }
}

/// Decodes a nullable remote scalar.
pub fn optional_to_config<T: Clone>(remote: Option<&T>) -> Value<T> {
    remote.cloned().into()
}

/// Encodes a scalar for a nullable remote field.
pub fn optional_to_remote<T: Clone>(value: &Value<T>, field: Field) -> Result<Option<T>> {
    match value {
        Value::Known(value) => Ok(Some(value.clone())),
        Value::Null => Ok(None),
        Value::Unknown => Err(field.error_unknown()),
    }
}

/// Encodes a scalar for a remote field that must always be present.
pub fn required_to_remote<T: Clone>(value: &Value<T>, field: Field) -> Result<T> {
    optional_to_remote(value, field)?.ok_or_else(|| field.error_null())
}

/// Decodes a nullable remote collection whose order is significant.
pub fn list_to_config<T: Clone>(remote: Option<&[T]>) -> ListValue<T> {
    remote.map(<[T]>::to_vec).into()
}

/// Encodes an ordered collection for a nullable remote field, preserving element order.
pub fn list_to_remote<T: Clone>(value: &ListValue<T>, field: Field) -> Result<Option<Vec<T>>> {
    match value {
        ListValue::Known(elements) => Ok(Some(elements.clone())),
        ListValue::Null => Ok(None),
        ListValue::Unknown => Err(field.error_unknown()),
    }
}

/// Decodes a nullable remote collection that represents unordered membership.
pub fn set_to_config<T: Ord + Clone>(remote: Option<&[T]>) -> SetValue<T> {
    match remote {
        Some(members) => members.iter().cloned().collect(),
        None => SetValue::Null,
    }
}

/// Encodes an unordered collection for a nullable remote field.
///
/// Members are emitted in ascending order, so repeated encodes of the same set are stable.
pub fn set_to_remote<T: Ord + Clone>(
    value: &SetValue<T>,
    field: Field,
) -> Result<Option<Vec<T>>> {
    match value {
        SetValue::Known(members) => Ok(Some(members.iter().cloned().collect())),
        SetValue::Null => Ok(None),
        SetValue::Unknown => Err(field.error_unknown()),
    }
}

/// Encodes an unordered collection for a remote field that must always be present.
pub fn required_set_to_remote<T: Ord + Clone>(value: &SetValue<T>, field: Field) -> Result<Vec<T>> {
    set_to_remote(value, field)?.ok_or_else(|| field.error_null())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn field_path_is_dotted() {
        let root = Field::root();
        let rules = root.field(&"rules");
        let first = rules.field(&0);
        let sources = first.field(&"sources");
        assert_eq!(sources.path().to_string(), "rules.0.sources");
        assert_eq!(root.path().to_string(), "<root>");
    }

    #[rstest]
    #[case(Some("web"), Value::Known("web".to_owned()))]
    #[case(None, Value::Null)]
    fn decode_optional(#[case] remote: Option<&str>, #[case] expected: Value<String>) {
        let remote = remote.map(str::to_owned);
        assert_eq!(optional_to_config(remote.as_ref()), expected);
    }

    #[test]
    fn encode_optional() {
        let root = Field::root();
        let field = root.field(&"description");

        assert_eq!(
            optional_to_remote(&Value::Known(1), field),
            Ok(Some(1))
        );
        assert_eq!(optional_to_remote(&Value::<u8>::Null, field), Ok(None));
        assert_eq!(
            optional_to_remote(&Value::<u8>::Unknown, field)
                .unwrap_err()
                .to_string(),
            "description: value is not known yet and cannot be sent to the remote API"
        );
    }

    #[test]
    fn encode_required_rejects_null() {
        let root = Field::root();
        let err = required_to_remote(&Value::<String>::Null, root.field(&"name")).unwrap_err();
        assert_eq!(err.to_string(), "name: value is required but null");
    }

    #[test]
    fn null_and_empty_lists_stay_apart() {
        let root = Field::root();
        let field = root.field(&"domains");

        let null = list_to_config::<String>(None);
        let empty = list_to_config::<String>(Some(&[][..]));
        assert_eq!(null, ListValue::Null);
        assert_eq!(empty, ListValue::Known(Vec::new()));

        assert_eq!(list_to_remote(&null, field), Ok(None));
        assert_eq!(list_to_remote(&empty, field), Ok(Some(Vec::new())));
    }

    #[test]
    fn list_order_is_preserved() {
        let root = Field::root();
        let ports = ["8080".to_owned(), "22".to_owned(), "443".to_owned()];

        let decoded = list_to_config(Some(&ports[..]));
        let encoded = list_to_remote(&decoded, root.field(&"ports")).unwrap();

        assert_eq!(encoded.as_deref(), Some(&ports[..]));
    }

    #[test]
    fn set_ignores_remote_order() {
        let root = Field::root();
        let a = ["b".to_owned(), "a".to_owned()];
        let b = ["a".to_owned(), "b".to_owned()];

        let decoded = set_to_config(Some(&a[..]));
        assert_eq!(decoded, set_to_config(Some(&b[..])));
        assert_eq!(
            set_to_remote(&decoded, root.field(&"peers")),
            Ok(Some(b.to_vec()))
        );
    }

    #[test]
    fn null_and_empty_sets_stay_apart() {
        let root = Field::root();
        let field = root.field(&"peers");

        assert_eq!(set_to_remote(&set_to_config::<String>(None), field), Ok(None));
        assert_eq!(
            set_to_remote(&set_to_config::<String>(Some(&[][..])), field),
            Ok(Some(Vec::new()))
        );
        assert_eq!(
            required_set_to_remote(&SetValue::<String>::Null, field)
                .unwrap_err()
                .field()
                .to_string(),
            "peers"
        );
    }

    #[test]
    fn unknown_collections_do_not_encode() {
        let root = Field::root();
        let field = root.field(&"groups");

        assert!(matches!(
            list_to_remote(&ListValue::<String>::Unknown, field),
            Err(Error::UnknownValue { .. })
        ));
        assert!(matches!(
            set_to_remote(&SetValue::<String>::Unknown, field),
            Err(Error::UnknownValue { .. })
        ));
    }
}
