use crate::{
    api::{GroupMinimum, PeerMinimum},
    value::{ListValue, SetValue},
};

use super::{Field, Result};

/// A remote object that is referenced by its identifier only in the configuration model.
///
/// Decoding projects each embedded object down to [`Identified::id`]; encoding rebuilds a
/// minimal object through [`Identified::from_id`] where the remote API expects object shape.
pub trait Identified {
    fn id(&self) -> &str;

    fn from_id(id: String) -> Self;
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }

    fn from_id(id: String) -> Self {
        id
    }
}

impl Identified for GroupMinimum {
    fn id(&self) -> &str {
        &self.id
    }

    fn from_id(id: String) -> Self {
        Self { id, name: None }
    }
}

impl Identified for PeerMinimum {
    fn id(&self) -> &str {
        &self.id
    }

    fn from_id(id: String) -> Self {
        Self { id, name: None }
    }
}

fn project<'a, E: Identified>(
    elements: &'a [E],
    field: Field,
) -> Result<impl Iterator<Item = String> + 'a> {
    if let Some(index) = elements.iter().position(|element| element.id().is_empty()) {
        let element = field.field(&index);
        return Err(element.error_shape("embedded object carries no identifier"));
    }
    Ok(elements.iter().map(|element| element.id().to_owned()))
}

/// Decodes embedded objects into an unordered set of their identifiers.
pub fn ids_to_config<E: Identified>(
    remote: Option<&[E]>,
    field: Field,
) -> Result<SetValue<String>> {
    match remote {
        Some(elements) => Ok(project(elements, field)?.collect()),
        None => Ok(SetValue::Null),
    }
}

/// Decodes embedded objects into an ordered list of their identifiers.
pub fn id_list_to_config<E: Identified>(
    remote: Option<&[E]>,
    field: Field,
) -> Result<ListValue<String>> {
    match remote {
        Some(elements) => Ok(project(elements, field)?.collect()),
        None => Ok(ListValue::Null),
    }
}

/// Encodes a set of identifiers into remote objects carrying only the identifier.
pub fn ids_to_remote<E: Identified>(
    value: &SetValue<String>,
    field: Field,
) -> Result<Option<Vec<E>>> {
    Ok(super::set_to_remote(value, field)?
        .map(|ids| ids.into_iter().map(E::from_id).collect()))
}

/// Encodes an ordered list of identifiers into remote objects carrying only the identifier.
pub fn id_list_to_remote<E: Identified>(
    value: &ListValue<String>,
    field: Field,
) -> Result<Option<Vec<E>>> {
    Ok(super::list_to_remote(value, field)?
        .map(|ids| ids.into_iter().map(E::from_id).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Error;

    fn group(id: &str, name: &str) -> GroupMinimum {
        GroupMinimum {
            id: id.to_owned(),
            name: Some(name.to_owned()),
        }
    }

    #[test]
    fn decode_projects_to_ids() {
        let root = Field::root();
        let groups = [group("g2", "Devs"), group("g1", "All")];

        let set = ids_to_config(Some(&groups[..]), root.field(&"groups")).unwrap();
        assert_eq!(
            set,
            ["g1", "g2"]
                .into_iter()
                .map(str::to_owned)
                .collect::<SetValue<_>>()
        );

        let list = id_list_to_config(Some(&groups[..]), root.field(&"groups")).unwrap();
        assert_eq!(list.as_known(), Some(&["g2".to_owned(), "g1".to_owned()][..]));
    }

    #[test]
    fn encode_rebuilds_minimal_objects() {
        let root = Field::root();
        let ids: ListValue<String> = ["g2", "g1"].into_iter().map(str::to_owned).collect();

        let groups: Option<Vec<GroupMinimum>> =
            id_list_to_remote(&ids, root.field(&"sources")).unwrap();
        assert_eq!(
            groups,
            Some(vec![
                GroupMinimum {
                    id: "g2".to_owned(),
                    name: None,
                },
                GroupMinimum {
                    id: "g1".to_owned(),
                    name: None,
                },
            ])
        );

        let plain: Option<Vec<String>> =
            ids_to_remote(&SetValue::Null, root.field(&"peers")).unwrap();
        assert_eq!(plain, None);
    }

    #[test]
    fn element_without_id_is_a_conversion_error() {
        let root = Field::root();
        let peers = [
            PeerMinimum {
                id: "p1".to_owned(),
                name: None,
            },
            PeerMinimum {
                id: String::new(),
                name: Some("ghost".to_owned()),
            },
        ];

        let err = ids_to_config(Some(&peers[..]), root.field(&"peers")).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
        assert_eq!(err.field().to_string(), "peers.1");
    }
}
