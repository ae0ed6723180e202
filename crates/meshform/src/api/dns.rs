use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum NameserverType {
    #[default]
    Udp,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Nameserver {
    pub ip: String,
    pub ns_type: NameserverType,
    pub port: i64,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NameserverGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub nameservers: Vec<Nameserver>,
    pub enabled: bool,
    pub groups: Vec<String>,

    /// Resolves all domains when set; mutually exclusive with match domains.
    pub primary: bool,

    pub domains: Option<Vec<String>>,
    pub search_domains_enabled: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NameserverGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub nameservers: Vec<Nameserver>,
    pub enabled: bool,
    pub groups: Vec<String>,
    pub primary: bool,
    pub domains: Option<Vec<String>>,
    pub search_domains_enabled: bool,
}

/// A custom DNS zone served to peers in the distribution groups.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DnsZone {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub enabled: bool,
    pub enable_search_domain: bool,
    pub distribution_groups: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DnsZoneRequest {
    pub name: String,
    pub domain: String,
    pub enabled: bool,
    pub enable_search_domain: bool,
    pub distribution_groups: Option<Vec<String>>,
}
