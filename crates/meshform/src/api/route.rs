use serde::{Deserialize, Serialize};

/// A network route. Exactly one of `network` and `domains` is set, and exactly one of `peer`
/// and `peer_groups`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    pub description: Option<String>,
    pub network_id: String,
    pub enabled: bool,
    pub peer: Option<String>,
    pub peer_groups: Option<Vec<String>>,
    pub network: Option<String>,
    pub domains: Option<Vec<String>>,
    pub metric: i64,
    pub masquerade: bool,
    pub groups: Vec<String>,
    pub keep_route: bool,
    pub access_control_groups: Option<Vec<String>>,

    /// Computed by the remote system from `network`, for example `IPv4`.
    pub network_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RouteRequest {
    pub description: Option<String>,
    pub network_id: String,
    pub enabled: bool,
    pub peer: Option<String>,
    pub peer_groups: Option<Vec<String>>,
    pub network: Option<String>,
    pub domains: Option<Vec<String>>,
    pub metric: i64,
    pub masquerade: bool,
    pub groups: Vec<String>,
    pub keep_route: bool,
    pub access_control_groups: Option<Vec<String>>,
}
