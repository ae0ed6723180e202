use crate::{
    api::{Group, GroupRequest},
    convert::{self, Field, ids_to_config, optional_to_config, required_to_remote, set_to_remote},
    selector::{Criteria, Selector},
    value::{SetValue, Value, merge::impl_merge},
    variant::endpoint::ResourceRef,
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub peers: SetValue<String>,
    pub resources: SetValue<ResourceRef>,
    pub issued: Value<String>,
}

impl_merge!(GroupConfig {
    id,
    name,
    peers,
    resources,
    issued,
});

impl Resource for GroupConfig {
    type Remote = Group;
    type Request = GroupRequest;

    const KIND: &'static str = "group";

    fn from_remote(group: &Group) -> Result<Self> {
        let root = Field::root();
        Ok(Self {
            id: Value::Known(group.id.clone()),
            name: Value::Known(group.name.clone()),
            peers: ids_to_config(group.peers.as_deref(), root.field(&"peers"))?,
            resources: match &group.resources {
                Some(resources) => resources.iter().map(ResourceRef::from).collect(),
                None => SetValue::Null,
            },
            issued: optional_to_config(group.issued.as_ref()),
        })
    }

    fn to_request(&self) -> Result<GroupRequest> {
        let root = Field::root();
        Ok(GroupRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            peers: set_to_remote(&self.peers, root.field(&"peers"))?,
            resources: set_to_remote(&self.resources, root.field(&"resources"))?
                .map(|resources| resources.into_iter().map(Into::into).collect()),
        })
    }
}

/// Looks up a group by identifier or name.
#[derive(Clone, Debug, Default)]
pub struct GroupSelector {
    pub id: Value<String>,
    pub name: Value<String>,
}

impl Selector for GroupSelector {
    type Entity = Group;

    const KIND: &'static str = GroupConfig::KIND;

    fn criteria(&self) -> Criteria<'_, Group> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |group: &Group| Some(&group.id))
            .field("name", &self.name, |group: &Group| Some(&group.name))
    }
}
