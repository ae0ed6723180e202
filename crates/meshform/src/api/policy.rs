use serde::{Deserialize, Serialize};

use super::{GroupMinimum, Resource};

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
pub enum RuleAction {
    Accept,
    Drop,
}

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
pub enum Protocol {
    All,
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    /// Whether rules using this protocol may restrict ports.
    pub const fn supports_ports(self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RulePortRange {
    pub start: u16,
    pub end: u16,
}

/// A single access rule.
///
/// Each endpoint (source and destination) is either a list of groups or a single resource,
/// never both.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PolicyRule {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub action: RuleAction,
    pub bidirectional: bool,
    pub protocol: Protocol,
    pub ports: Option<Vec<String>>,
    pub port_ranges: Option<Vec<RulePortRange>>,
    pub sources: Option<Vec<GroupMinimum>>,
    pub destinations: Option<Vec<GroupMinimum>>,

    #[serde(rename = "sourceResource")]
    pub source_resource: Option<Resource>,

    #[serde(rename = "destinationResource")]
    pub destination_resource: Option<Resource>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PolicyRuleRequest {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub action: RuleAction,
    pub bidirectional: bool,
    pub protocol: Protocol,
    pub ports: Option<Vec<String>>,
    pub port_ranges: Option<Vec<RulePortRange>>,
    pub sources: Option<Vec<String>>,
    pub destinations: Option<Vec<String>>,

    #[serde(rename = "sourceResource")]
    pub source_resource: Option<Resource>,

    #[serde(rename = "destinationResource")]
    pub destination_resource: Option<Resource>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub rules: Vec<PolicyRule>,
    pub source_posture_checks: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PolicyRequest {
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub rules: Vec<PolicyRuleRequest>,
    pub source_posture_checks: Option<Vec<String>>,
}
