//! Sub-structures whose sibling fields are alternative representations of one logical value.
//!
//! At the remote layer such a value is a set of independently optional sibling fields, of which
//! the remote system promises to populate at most one. The configuration layer mirrors that as
//! independently nullable sibling attributes. Both directions check the promise instead of
//! picking a winner: two populated siblings are a [`convert::Error::MultipleVariants`].
//!
//! - [`endpoint`]: rule sources and destinations (group list XOR single resource).
//! - [`posture`]: posture check kinds, which are independent rather than exclusive, but carry
//!   shape rules of their own.

use crate::convert::{self, Field};

pub mod endpoint;
pub mod posture;

/// Returns the name of the single populated sibling, or [`None`] if no sibling is populated.
///
/// `siblings` pairs every sibling's name with whether it is populated.
pub fn exclusive(
    field: Field,
    siblings: &[(&'static str, bool)],
) -> Result<Option<&'static str>, convert::Error> {
    let populated: Vec<&'static str> = siblings
        .iter()
        .filter(|(_, populated)| *populated)
        .map(|(name, _)| *name)
        .collect();

    if populated.len() > 1 {
        return Err(convert::Error::MultipleVariants {
            field: field.path(),
            variants: populated,
        });
    }

    Ok(populated.first().copied())
}
