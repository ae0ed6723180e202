use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CheckAction {
    Allow,
    Deny,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MinVersionCheck {
    pub min_version: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MinKernelVersionCheck {
    pub min_kernel_version: String,
}

/// Minimum OS versions per platform. Linux and Windows are checked by kernel version.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OsVersionCheck {
    pub android: Option<MinVersionCheck>,
    pub darwin: Option<MinVersionCheck>,
    pub ios: Option<MinVersionCheck>,
    pub linux: Option<MinKernelVersionCheck>,
    pub windows: Option<MinKernelVersionCheck>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Location {
    pub country_code: String,
    pub city_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GeoLocationCheck {
    pub locations: Vec<Location>,
    pub action: CheckAction,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PeerNetworkRangeCheck {
    pub ranges: Vec<String>,
    pub action: CheckAction,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Process {
    pub linux_path: Option<String>,
    pub mac_path: Option<String>,
    pub windows_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProcessCheck {
    pub processes: Vec<Process>,
}

/// The check kinds of a posture check. Unlike rule endpoints, any combination of them may be
/// set at once.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Checks {
    pub nb_version_check: Option<MinVersionCheck>,
    pub os_version_check: Option<OsVersionCheck>,
    pub geo_location_check: Option<GeoLocationCheck>,
    pub peer_network_range_check: Option<PeerNetworkRangeCheck>,
    pub process_check: Option<ProcessCheck>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PostureCheck {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub checks: Checks,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PostureCheckRequest {
    pub name: String,
    pub description: Option<String>,
    pub checks: Checks,
}
