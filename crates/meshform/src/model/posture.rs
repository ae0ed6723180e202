use crate::{
    api::{PostureCheck, PostureCheckRequest},
    convert::{self, Field, optional_to_config, optional_to_remote, required_to_remote},
    selector::{Criteria, Selector},
    value::{Value, merge::impl_merge},
    variant::posture::{ChecksConfig, decode_checks, encode_checks},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

/// A posture check that peers must pass before policies referencing it apply to them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PostureCheckConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub checks: ChecksConfig,
}

impl_merge!(PostureCheckConfig {
    id,
    name,
    description,
    checks,
});

impl Resource for PostureCheckConfig {
    type Remote = PostureCheck;
    type Request = PostureCheckRequest;

    const KIND: &'static str = "posture check";

    fn from_remote(posture: &PostureCheck) -> Result<Self> {
        let root = Field::root();
        Ok(Self {
            id: Value::Known(posture.id.clone()),
            name: Value::Known(posture.name.clone()),
            description: optional_to_config(posture.description.as_ref()),
            checks: decode_checks(&posture.checks, root.field(&"checks"))?,
        })
    }

    fn to_request(&self) -> Result<PostureCheckRequest> {
        let root = Field::root();
        let checks_field = root.field(&"checks");
        if self.checks.is_empty() {
            return Err(checks_field.error_shape("at least one check must be set"));
        }

        Ok(PostureCheckRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            description: optional_to_remote(&self.description, root.field(&"description"))?,
            checks: encode_checks(&self.checks, checks_field)?,
        })
    }
}

/// Looks up a posture check by identifier or name.
#[derive(Clone, Debug, Default)]
pub struct PostureCheckSelector {
    pub id: Value<String>,
    pub name: Value<String>,
}

impl Selector for PostureCheckSelector {
    type Entity = PostureCheck;

    const KIND: &'static str = PostureCheckConfig::KIND;

    fn criteria(&self) -> Criteria<'_, PostureCheck> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |posture: &PostureCheck| Some(&posture.id))
            .field("name", &self.name, |posture: &PostureCheck| Some(&posture.name))
    }
}
