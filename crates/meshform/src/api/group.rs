use serde::{Deserialize, Serialize};

/// The kind of a network resource a rule or group can refer to.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Host,
    Subnet,
    Domain,
    Peer,
}

/// A typed reference to a network resource.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Resource {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// The minimal representation of a group embedded in other entities.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupMinimum {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The minimal representation of a peer embedded in other entities.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PeerMinimum {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub peers: Option<Vec<PeerMinimum>>,
    pub resources: Option<Vec<Resource>>,

    /// How the group was created, for example `api` or `jwt`.
    pub issued: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupRequest {
    pub name: String,
    pub peers: Option<Vec<String>>,
    pub resources: Option<Vec<Resource>>,
}
