use serde::{Deserialize, Serialize};

use super::{GroupMinimum, ResourceKind};

/// A host, subnet or domain made reachable through a network's routers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NetworkResource {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub enabled: bool,
    pub groups: Vec<GroupMinimum>,

    /// Computed by the remote system from `address`.
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NetworkResourceRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub enabled: bool,
    pub groups: Vec<String>,
}
