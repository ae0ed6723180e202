use serde::{Deserialize, Serialize};

use super::GroupMinimum;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub dns_label: String,
    pub hostname: String,
    pub connected: bool,
    pub ssh_enabled: bool,
    pub login_expiration_enabled: bool,
    pub os: Option<String>,
    pub version: Option<String>,
    pub groups: Option<Vec<GroupMinimum>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PeerRequest {
    pub name: String,
    pub ssh_enabled: bool,
    pub login_expiration_enabled: bool,
}
