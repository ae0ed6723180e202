//! Rule endpoints: a rule's source (or destination) is either an ordered list of group
//! identifiers or a single typed resource reference.
use crate::{
    api::{Resource, ResourceKind},
    convert::{self, Field, Identified, id_list_to_config, id_list_to_remote},
    value::{ListValue, Value},
};

use super::exclusive;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

const GROUPS: &str = "groups";
const RESOURCE: &str = "resource";

/// A typed reference to a single network resource.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ResourceRef {
    pub id: String,
    pub kind: ResourceKind,
}

impl From<&Resource> for ResourceRef {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            kind: resource.kind,
        }
    }
}

impl From<ResourceRef> for Resource {
    fn from(reference: ResourceRef) -> Self {
        Self {
            id: reference.id,
            kind: reference.kind,
        }
    }
}

/// The populated variant of an [`EndpointConfig`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Groups(Vec<String>),
    Resource(ResourceRef),
}

/// Configuration-side endpoint with one nullable attribute per variant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EndpointConfig {
    pub groups: ListValue<String>,
    pub resource: Value<ResourceRef>,
}

impl EndpointConfig {
    pub fn from_groups(groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            resource: Value::Null,
        }
    }

    pub fn from_resource(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            groups: ListValue::Null,
            resource: Value::Known(ResourceRef {
                id: id.into(),
                kind,
            }),
        }
    }

    /// Names of the variants that are known to be populated.
    ///
    /// A known but empty group list does not count as populated. Unknown attributes are left
    /// out, as they may still turn out null.
    pub fn populated_variants(&self) -> Vec<&'static str> {
        let mut populated = Vec::new();
        if self.groups.is_populated() {
            populated.push(GROUPS);
        }
        if self.resource.is_known() {
            populated.push(RESOURCE);
        }
        populated
    }

    /// Resolves the single populated variant, if any.
    pub fn variant(&self, field: Field) -> Result<Option<Endpoint>> {
        if self.groups.is_unknown() {
            return Err(field.field(&GROUPS).error_unknown());
        }
        if self.resource.is_unknown() {
            return Err(field.field(&RESOURCE).error_unknown());
        }

        let variant = exclusive(
            field,
            &[
                (GROUPS, self.groups.is_populated()),
                (RESOURCE, self.resource.is_known()),
            ],
        )?;

        Ok(match (variant, &self.groups, &self.resource) {
            (Some(RESOURCE), _, Value::Known(resource)) => {
                Some(Endpoint::Resource(resource.clone()))
            }
            (Some(GROUPS), ListValue::Known(groups), _) => Some(Endpoint::Groups(groups.clone())),
            _ => None,
        })
    }
}

/// Remote-side endpoint siblings, as found on a rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteEndpoint<E> {
    pub groups: Option<Vec<E>>,
    pub resource: Option<Resource>,
}

/// Decodes the remote endpoint siblings into configuration.
///
/// A remote group list that is present but empty next to a resource is not a second variant.
/// It is kept as a known empty list, so encoding the result reproduces it.
pub fn decode_endpoint<E: Identified>(
    groups: Option<&[E]>,
    resource: Option<&Resource>,
    field: Field,
) -> Result<EndpointConfig> {
    let variant = exclusive(
        field,
        &[
            (GROUPS, groups.is_some_and(|groups| !groups.is_empty())),
            (RESOURCE, resource.is_some()),
        ],
    )?;
    tracing::trace!(
        endpoint.field = %field.path(),
        endpoint.variant = ?variant,
        "decoded endpoint"
    );

    Ok(EndpointConfig {
        groups: id_list_to_config(groups, field.field(&GROUPS))?,
        resource: resource.map(ResourceRef::from).into(),
    })
}

/// Encodes the configured endpoint into remote siblings, at most one of them populated.
///
/// The group list is passed through as it is next to either variant, so a null list stays
/// absent and a known empty list stays empty.
pub fn encode_endpoint<E: Identified>(
    config: &EndpointConfig,
    field: Field,
) -> Result<RemoteEndpoint<E>> {
    let variant = config.variant(field)?;
    tracing::trace!(
        endpoint.field = %field.path(),
        endpoint.variant = ?variant,
        "encoding endpoint"
    );

    let groups = id_list_to_remote(&config.groups, field.field(&GROUPS))?;
    let resource = match variant {
        Some(Endpoint::Resource(resource)) => Some(resource.into()),
        Some(Endpoint::Groups(_)) | None => None,
    };
    Ok(RemoteEndpoint { groups, resource })
}
