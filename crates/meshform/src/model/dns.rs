//! Nameserver groups and custom DNS zones.
use crate::{
    api::{
        DnsZone, DnsZoneRequest, Nameserver, NameserverGroup, NameserverGroupRequest,
        NameserverType,
    },
    convert::{
        self, Field, list_to_config, list_to_remote, optional_to_config, optional_to_remote,
        required_set_to_remote, required_to_remote, set_to_config, set_to_remote,
    },
    selector::{Criteria, Selector},
    value::{ListValue, SetValue, Value, merge::impl_merge},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NameserverConfig {
    pub ip: Value<String>,
    pub ns_type: Value<NameserverType>,
    pub port: Value<i64>,
}

impl From<&Nameserver> for NameserverConfig {
    fn from(nameserver: &Nameserver) -> Self {
        Self {
            ip: Value::Known(nameserver.ip.clone()),
            ns_type: Value::Known(nameserver.ns_type),
            port: Value::Known(nameserver.port),
        }
    }
}

impl NameserverConfig {
    fn to_remote(&self, field: Field) -> Result<Nameserver> {
        Ok(Nameserver {
            ip: required_to_remote(&self.ip, field.field(&"ip"))?,
            ns_type: required_to_remote(&self.ns_type, field.field(&"ns_type"))?,
            port: required_to_remote(&self.port, field.field(&"port"))?,
        })
    }
}

/// A group of upstream nameservers, used either for all domains (primary) or for a list of
/// match domains.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NameserverGroupConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub nameservers: ListValue<NameserverConfig>,
    pub enabled: Value<bool>,
    pub groups: SetValue<String>,
    pub primary: Value<bool>,
    pub domains: ListValue<String>,
    pub search_domains_enabled: Value<bool>,
}

impl_merge!(NameserverGroupConfig {
    id,
    name,
    description,
    nameservers,
    enabled,
    groups,
    primary,
    domains,
    search_domains_enabled,
});

impl Resource for NameserverGroupConfig {
    type Remote = NameserverGroup;
    type Request = NameserverGroupRequest;

    const KIND: &'static str = "nameserver group";

    fn from_remote(group: &NameserverGroup) -> Result<Self> {
        Ok(Self {
            id: Value::Known(group.id.clone()),
            name: Value::Known(group.name.clone()),
            description: optional_to_config(group.description.as_ref()),
            nameservers: group.nameservers.iter().map(NameserverConfig::from).collect(),
            enabled: Value::Known(group.enabled),
            groups: set_to_config(Some(group.groups.as_slice())),
            primary: Value::Known(group.primary),
            domains: list_to_config(group.domains.as_deref()),
            search_domains_enabled: Value::Known(group.search_domains_enabled),
        })
    }

    fn to_request(&self) -> Result<NameserverGroupRequest> {
        let root = Field::root();
        let nameservers_field = root.field(&"nameservers");
        let nameservers = match &self.nameservers {
            ListValue::Known(nameservers) => nameservers
                .iter()
                .enumerate()
                .map(|(index, nameserver)| nameserver.to_remote(nameservers_field.field(&index)))
                .collect::<Result<Vec<_>>>()?,
            ListValue::Null => return Err(nameservers_field.error_null()),
            ListValue::Unknown => return Err(nameservers_field.error_unknown()),
        };

        Ok(NameserverGroupRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            description: optional_to_remote(&self.description, root.field(&"description"))?,
            nameservers,
            enabled: required_to_remote(&self.enabled, root.field(&"enabled"))?,
            groups: required_set_to_remote(&self.groups, root.field(&"groups"))?,
            primary: required_to_remote(&self.primary, root.field(&"primary"))?,
            domains: list_to_remote(&self.domains, root.field(&"domains"))?,
            search_domains_enabled: required_to_remote(
                &self.search_domains_enabled,
                root.field(&"search_domains_enabled"),
            )?,
        })
    }
}

/// Looks up a nameserver group by identifier, name or one of its match domains.
#[derive(Clone, Debug, Default)]
pub struct NameserverGroupSelector {
    pub id: Value<String>,
    pub name: Value<String>,
    pub domain: Value<String>,
}

impl Selector for NameserverGroupSelector {
    type Entity = NameserverGroup;

    const KIND: &'static str = NameserverGroupConfig::KIND;

    fn criteria(&self) -> Criteria<'_, NameserverGroup> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |group: &NameserverGroup| Some(&group.id))
            .field("name", &self.name, |group: &NameserverGroup| Some(&group.name))
            .list_field("domain", &self.domain, |group: &NameserverGroup| {
                group.domains.as_deref()
            })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DnsZoneConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub domain: Value<String>,
    pub enabled: Value<bool>,
    pub enable_search_domain: Value<bool>,
    pub distribution_groups: SetValue<String>,
}

impl_merge!(DnsZoneConfig {
    id,
    name,
    domain,
    enabled,
    enable_search_domain,
    distribution_groups,
});

impl Resource for DnsZoneConfig {
    type Remote = DnsZone;
    type Request = DnsZoneRequest;

    const KIND: &'static str = "zone";

    fn from_remote(zone: &DnsZone) -> Result<Self> {
        Ok(Self {
            id: Value::Known(zone.id.clone()),
            name: Value::Known(zone.name.clone()),
            domain: Value::Known(zone.domain.clone()),
            enabled: Value::Known(zone.enabled),
            enable_search_domain: Value::Known(zone.enable_search_domain),
            distribution_groups: set_to_config(zone.distribution_groups.as_deref()),
        })
    }

    fn to_request(&self) -> Result<DnsZoneRequest> {
        let root = Field::root();
        Ok(DnsZoneRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            domain: required_to_remote(&self.domain, root.field(&"domain"))?,
            enabled: required_to_remote(&self.enabled, root.field(&"enabled"))?,
            enable_search_domain: required_to_remote(
                &self.enable_search_domain,
                root.field(&"enable_search_domain"),
            )?,
            distribution_groups: set_to_remote(
                &self.distribution_groups,
                root.field(&"distribution_groups"),
            )?,
        })
    }
}

/// Looks up a zone by identifier, name or domain.
#[derive(Clone, Debug, Default)]
pub struct ZoneSelector {
    pub id: Value<String>,
    pub name: Value<String>,
    pub domain: Value<String>,
}

impl Selector for ZoneSelector {
    type Entity = DnsZone;

    const KIND: &'static str = DnsZoneConfig::KIND;

    fn criteria(&self) -> Criteria<'_, DnsZone> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |zone: &DnsZone| Some(&zone.id))
            .field("name", &self.name, |zone: &DnsZone| Some(&zone.name))
            .field("domain", &self.domain, |zone: &DnsZone| Some(&zone.domain))
    }
}
