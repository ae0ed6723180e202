use snafu::Snafu;

use crate::{convert, selector, validation};

/// Any error surfaced by a provider operation.
///
/// None of these are retried or recovered from inside the core; callers report them as they
/// are, using [`Error::kind`] to classify them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(transparent)]
    Selector { source: selector::Error },

    #[snafu(transparent)]
    Conversion { source: convert::Error },

    #[snafu(transparent)]
    Validation { source: validation::Error },

    #[snafu(display("failed to {operation} {kind} through the management API"))]
    Client {
        source: Box<dyn std::error::Error + Send + Sync>,
        kind: &'static str,
        operation: &'static str,
    },
}

/// The classification of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
pub enum ErrorKind {
    NoSelector,
    NotFound,
    MultipleMatches,
    Conversion,
    Validation,
    Client,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Selector { source } => match source {
                selector::Error::NoSelector { .. } => ErrorKind::NoSelector,
                selector::Error::NotFound { .. } => ErrorKind::NotFound,
                selector::Error::MultipleMatches { .. } => ErrorKind::MultipleMatches,
            },
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Client { .. } => ErrorKind::Client,
        }
    }
}
