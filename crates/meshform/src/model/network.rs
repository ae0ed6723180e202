use crate::{
    api::{NetworkResource, NetworkResourceRequest, ResourceKind},
    convert::{
        self, Field, ids_to_config, optional_to_config, optional_to_remote, required_set_to_remote,
        required_to_remote,
    },
    selector::{Criteria, Selector},
    value::{SetValue, Value, merge::impl_merge},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

/// A host, subnet or domain inside a network. The kind is derived from the address by the
/// remote system.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NetworkResourceConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub address: Value<String>,
    pub enabled: Value<bool>,
    pub groups: SetValue<String>,
    pub kind: Value<ResourceKind>,
}

impl_merge!(NetworkResourceConfig {
    id,
    name,
    description,
    address,
    enabled,
    groups,
    kind,
});

impl Resource for NetworkResourceConfig {
    type Remote = NetworkResource;
    type Request = NetworkResourceRequest;

    const KIND: &'static str = "network resource";

    fn from_remote(resource: &NetworkResource) -> Result<Self> {
        let root = Field::root();
        Ok(Self {
            id: Value::Known(resource.id.clone()),
            name: Value::Known(resource.name.clone()),
            description: optional_to_config(resource.description.as_ref()),
            address: Value::Known(resource.address.clone()),
            enabled: Value::Known(resource.enabled),
            groups: ids_to_config(Some(resource.groups.as_slice()), root.field(&"groups"))?,
            kind: Value::Known(resource.kind),
        })
    }

    fn to_request(&self) -> Result<NetworkResourceRequest> {
        let root = Field::root();
        Ok(NetworkResourceRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            description: optional_to_remote(&self.description, root.field(&"description"))?,
            address: required_to_remote(&self.address, root.field(&"address"))?,
            enabled: required_to_remote(&self.enabled, root.field(&"enabled"))?,
            groups: required_set_to_remote(&self.groups, root.field(&"groups"))?,
        })
    }
}

/// Looks up a network resource by identifier, name or address.
#[derive(Clone, Debug, Default)]
pub struct NetworkResourceSelector {
    pub id: Value<String>,
    pub name: Value<String>,
    pub address: Value<String>,
}

impl Selector for NetworkResourceSelector {
    type Entity = NetworkResource;

    const KIND: &'static str = NetworkResourceConfig::KIND;

    fn criteria(&self) -> Criteria<'_, NetworkResource> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |resource: &NetworkResource| Some(&resource.id))
            .field("name", &self.name, |resource: &NetworkResource| {
                Some(&resource.name)
            })
            .field("address", &self.address, |resource: &NetworkResource| {
                Some(&resource.address)
            })
    }
}
