//! Cross-field invariants, checked after encoding and before any mutating call is issued.
//!
//! The remote API accepts some contradictory combinations and silently picks an
//! interpretation (a primary nameserver group with match domains simply ignores the
//! domains). These invariants reject such configurations instead.
//!
//! Invariants are evaluated as a fixed, ordered list and the first violation is returned. Later
//! invariants may assume earlier ones hold. An invariant that depends on a value which is still
//! unknown is skipped, it will be checked again once the value is known.

use std::sync::LazyLock;

use regex::Regex;
use snafu::{ResultExt as _, Snafu, ensure};

use crate::{
    api::Protocol,
    convert::{Field, FieldPath},
    model::{
        dns::{DnsZoneConfig, NameserverGroupConfig},
        group::GroupConfig,
        network::NetworkResourceConfig,
        peer::PeerConfig,
        policy::PolicyConfig,
        posture::PostureCheckConfig,
        route::RouteConfig,
    },
    value::{ListValue, Value},
    variant::endpoint::EndpointConfig,
};

const RFC_1123_LABEL_FMT: &str = "[a-zA-Z0-9]([-a-zA-Z0-9]*[a-zA-Z0-9])?";

/// This is a subdomain's max length in DNS (RFC 1123)
const DOMAIN_MAX_LENGTH: usize = 253;

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^{RFC_1123_LABEL_FMT}(\\.{RFC_1123_LABEL_FMT})*\\.?$"
    ))
    .expect("failed to compile domain regex")
});

/// ISO 3166-1 alpha-2, as used by geo-location checks.
static COUNTRY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z]{2}$").expect("failed to compile country code regex"));

type Result<T = (), E = Error> = std::result::Result<T, E>;

/// A single violated invariant.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("a primary nameserver group must not have match domains"))]
    PrimaryWithDomains,

    #[snafu(display(
        "a nameserver group must either be primary or have at least one match domain"
    ))]
    NeitherPrimaryNorDomains,

    #[snafu(display("search domains cannot be enabled on a primary nameserver group"))]
    SearchDomainsOnPrimary,

    #[snafu(display("a nameserver group needs at least one nameserver"))]
    NoNameservers,

    #[snafu(display("nameservers.{index}: port {port} is outside of 1..=65535"))]
    InvalidNameserverPort { index: usize, port: i64 },

    #[snafu(display(
        "{field}: {domain:?} is not a valid domain, it must consist of alphanumeric characters, '-' or '.' and be at most {DOMAIN_MAX_LENGTH} bytes long"
    ))]
    InvalidDomain { field: FieldPath, domain: String },

    #[snafu(display(
        "{field}: a group list and a resource are both set, but at most one of them is allowed"
    ))]
    ConflictingEndpoint { field: FieldPath },

    #[snafu(display("{field}: ports can only be restricted for tcp and udp, not {protocol}"))]
    PortsWithoutPortProtocol { field: FieldPath, protocol: Protocol },

    #[snafu(display("{field}: port range {start}-{end} ends before it starts"))]
    InvalidPortRange {
        field: FieldPath,
        start: u16,
        end: u16,
    },

    #[snafu(display("a route must not have both a network and domains"))]
    NetworkAndDomains,

    #[snafu(display("a route needs either a network or at least one domain"))]
    NeitherNetworkNorDomains,

    #[snafu(display("a route must not have both a routing peer and peer groups"))]
    PeerAndPeerGroups,

    #[snafu(display("a route needs either a routing peer or at least one peer group"))]
    NeitherPeerNorPeerGroups,

    #[snafu(display("{field}: {version:?} is not a valid version"))]
    InvalidVersion {
        source: semver::Error,
        field: FieldPath,
        version: String,
    },

    #[snafu(display("{field}: {code:?} is not a two-letter uppercase country code"))]
    InvalidCountryCode { field: FieldPath, code: String },
}

/// A configuration model with cross-field invariants.
pub trait Validate {
    /// Returns the first violated invariant, if any.
    fn validate(&self) -> Result;
}

type Invariant<T> = fn(&T) -> Result;

/// Evaluates `invariants` in order and stops at the first violation.
pub fn check_all<T>(config: &T, invariants: &[Invariant<T>]) -> Result {
    let result = invariants
        .iter()
        .try_for_each(|invariant| invariant(config));

    if let Err(err) = &result {
        tracing::debug!(
            config.kind = std::any::type_name::<T>(),
            error = %err,
            "configuration violates invariant"
        );
    }
    result
}

/// Reads a flag, treating null as unset. Returns [`None`] while the flag is unknown.
fn flag(value: &Value<bool>) -> Option<bool> {
    match value {
        Value::Known(flag) => Some(*flag),
        Value::Null => Some(false),
        Value::Unknown => None,
    }
}

fn check_domain(domain: &str, field: Field) -> Result {
    ensure!(
        domain.len() <= DOMAIN_MAX_LENGTH && DOMAIN_REGEX.is_match(domain),
        InvalidDomainSnafu {
            field: field.path(),
            domain,
        }
    );
    Ok(())
}

impl Validate for NameserverGroupConfig {
    fn validate(&self) -> Result {
        check_all(self, &[
            primary_xor_domains,
            no_search_domains_on_primary,
            has_nameservers,
            nameserver_ports_in_range,
            domains_are_valid,
        ])
    }
}

fn primary_xor_domains(group: &NameserverGroupConfig) -> Result {
    let Some(primary) = flag(&group.primary) else {
        return Ok(());
    };
    if group.domains.is_unknown() {
        return Ok(());
    }

    let has_domains = group.domains.is_populated();
    ensure!(!(primary && has_domains), PrimaryWithDomainsSnafu);
    ensure!(primary || has_domains, NeitherPrimaryNorDomainsSnafu);
    Ok(())
}

fn no_search_domains_on_primary(group: &NameserverGroupConfig) -> Result {
    if let (Some(primary), Some(search_domains)) =
        (flag(&group.primary), flag(&group.search_domains_enabled))
    {
        ensure!(!(primary && search_domains), SearchDomainsOnPrimarySnafu);
    }
    Ok(())
}

fn has_nameservers(group: &NameserverGroupConfig) -> Result {
    ensure!(
        group.nameservers.is_unknown() || group.nameservers.is_populated(),
        NoNameserversSnafu
    );
    Ok(())
}

fn nameserver_ports_in_range(group: &NameserverGroupConfig) -> Result {
    let Some(nameservers) = group.nameservers.as_known() else {
        return Ok(());
    };
    for (index, nameserver) in nameservers.iter().enumerate() {
        if let Value::Known(port) = nameserver.port {
            ensure!(
                (1..=i64::from(u16::MAX)).contains(&port),
                InvalidNameserverPortSnafu { index, port }
            );
        }
    }
    Ok(())
}

fn domains_are_valid(group: &NameserverGroupConfig) -> Result {
    let root = Field::root();
    let field = root.field(&"domains");
    for (index, domain) in group.domains.as_known().unwrap_or_default().iter().enumerate() {
        check_domain(domain, field.field(&index))?;
    }
    Ok(())
}

impl Validate for DnsZoneConfig {
    fn validate(&self) -> Result {
        check_all(self, &[zone_domain_is_valid])
    }
}

fn zone_domain_is_valid(zone: &DnsZoneConfig) -> Result {
    match &zone.domain {
        Value::Known(domain) => check_domain(domain, Field::root().field(&"domain")),
        Value::Null | Value::Unknown => Ok(()),
    }
}

impl Validate for PolicyConfig {
    fn validate(&self) -> Result {
        check_all(self, &[
            rule_endpoints_are_exclusive,
            ports_only_with_port_protocols,
            port_ranges_are_ordered,
        ])
    }
}

fn check_endpoint(endpoint: &EndpointConfig, field: Field) -> Result {
    ensure!(
        endpoint.populated_variants().len() <= 1,
        ConflictingEndpointSnafu { field: field.path() }
    );
    Ok(())
}

fn rule_endpoints_are_exclusive(policy: &PolicyConfig) -> Result {
    let root = Field::root();
    let rules = root.field(&"rules");
    for (index, rule) in policy.rules.as_known().unwrap_or_default().iter().enumerate() {
        let rule_field = rules.field(&index);
        check_endpoint(&rule.sources, rule_field.field(&"sources"))?;
        check_endpoint(&rule.destinations, rule_field.field(&"destinations"))?;
    }
    Ok(())
}

fn ports_only_with_port_protocols(policy: &PolicyConfig) -> Result {
    let root = Field::root();
    let rules = root.field(&"rules");
    for (index, rule) in policy.rules.as_known().unwrap_or_default().iter().enumerate() {
        let Value::Known(protocol) = rule.protocol else {
            continue;
        };
        let restricts_ports = rule.ports.is_populated() || rule.port_ranges.is_populated();
        ensure!(
            protocol.supports_ports() || !restricts_ports,
            PortsWithoutPortProtocolSnafu {
                field: rules.field(&index).path(),
                protocol,
            }
        );
    }
    Ok(())
}

fn port_ranges_are_ordered(policy: &PolicyConfig) -> Result {
    let root = Field::root();
    let rules = root.field(&"rules");
    for (index, rule) in policy.rules.as_known().unwrap_or_default().iter().enumerate() {
        let rule_field = rules.field(&index);
        let ranges_field = rule_field.field(&"port_ranges");
        let ranges = rule.port_ranges.as_known().unwrap_or_default();
        for (range_index, range) in ranges.iter().enumerate() {
            ensure!(range.start <= range.end, InvalidPortRangeSnafu {
                field: ranges_field.field(&range_index).path(),
                start: range.start,
                end: range.end,
            });
        }
    }
    Ok(())
}

impl Validate for RouteConfig {
    fn validate(&self) -> Result {
        check_all(self, &[network_xor_domains, peer_xor_peer_groups])
    }
}

fn network_xor_domains(route: &RouteConfig) -> Result {
    if route.network.is_unknown() || route.domains.is_unknown() {
        return Ok(());
    }

    let has_network = route.network.is_known();
    let has_domains = route.domains.is_populated();
    ensure!(!(has_network && has_domains), NetworkAndDomainsSnafu);
    ensure!(has_network || has_domains, NeitherNetworkNorDomainsSnafu);
    Ok(())
}

fn peer_xor_peer_groups(route: &RouteConfig) -> Result {
    if route.peer.is_unknown() || route.peer_groups.is_unknown() {
        return Ok(());
    }

    let has_peer = route.peer.is_known();
    let has_peer_groups = route.peer_groups.is_populated();
    ensure!(!(has_peer && has_peer_groups), PeerAndPeerGroupsSnafu);
    ensure!(has_peer || has_peer_groups, NeitherPeerNorPeerGroupsSnafu);
    Ok(())
}

impl Validate for PostureCheckConfig {
    fn validate(&self) -> Result {
        check_all(self, &[nb_version_is_semver, country_codes_are_valid])
    }
}

fn nb_version_is_semver(posture: &PostureCheckConfig) -> Result {
    let Some(Value::Known(version)) = posture
        .checks
        .nb_version
        .as_known()
        .map(|check| &check.min_version)
    else {
        return Ok(());
    };

    let root = Field::root();
    let checks = root.field(&"checks");
    let nb_version = checks.field(&"nb_version_check");
    semver::Version::parse(version).with_context(|_| InvalidVersionSnafu {
        field: nb_version.field(&"min_version").path(),
        version: version.clone(),
    })?;
    Ok(())
}

fn country_codes_are_valid(posture: &PostureCheckConfig) -> Result {
    let Some(ListValue::Known(locations)) =
        posture.checks.geo_location.as_known().map(|geo| &geo.locations)
    else {
        return Ok(());
    };

    let root = Field::root();
    let checks = root.field(&"checks");
    let geo_location = checks.field(&"geo_location_check");
    let locations_field = geo_location.field(&"locations");
    for (index, location) in locations.iter().enumerate() {
        if let Value::Known(code) = &location.country_code {
            ensure!(COUNTRY_CODE_REGEX.is_match(code), InvalidCountryCodeSnafu {
                field: locations_field.field(&index).field(&"country_code").path(),
                code,
            });
        }
    }
    Ok(())
}

impl Validate for GroupConfig {
    fn validate(&self) -> Result {
        Ok(())
    }
}

impl Validate for PeerConfig {
    fn validate(&self) -> Result {
        Ok(())
    }
}

impl Validate for NetworkResourceConfig {
    fn validate(&self) -> Result {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;
    use crate::{
        api::{CheckAction, NameserverType, ResourceKind, RulePortRange},
        model::{dns::NameserverConfig, policy::PolicyRuleConfig},
        value::SetValue,
        variant::posture::{
            ChecksConfig, GeoLocationCheckConfig, LocationConfig, VersionCheckConfig,
        },
    };

    fn known(value: &str) -> Value<String> {
        Value::Known(value.to_owned())
    }

    fn nameserver(port: i64) -> NameserverConfig {
        NameserverConfig {
            ip: known("8.8.8.8"),
            ns_type: Value::Known(NameserverType::Udp),
            port: Value::Known(port),
        }
    }

    fn nameserver_group(primary: bool, domains: &[&str]) -> NameserverGroupConfig {
        NameserverGroupConfig {
            name: known("google"),
            nameservers: ListValue::Known(vec![nameserver(53)]),
            enabled: Value::Known(true),
            primary: Value::Known(primary),
            domains: domains.iter().map(|domain| (*domain).to_owned()).collect(),
            search_domains_enabled: Value::Known(false),
            ..Default::default()
        }
    }

    #[test]
    fn primary_with_domains() {
        let group = nameserver_group(true, &["a.com"]);
        assert!(matches!(group.validate(), Err(Error::PrimaryWithDomains)));
    }

    #[rstest]
    #[case(ListValue::Known(Vec::new()))]
    #[case(ListValue::Null)]
    fn neither_primary_nor_domains(#[case] domains: ListValue<String>) {
        let group = NameserverGroupConfig {
            domains,
            ..nameserver_group(false, &[])
        };
        assert!(matches!(
            group.validate(),
            Err(Error::NeitherPrimaryNorDomains)
        ));
    }

    #[rstest]
    #[case(nameserver_group(true, &[]))]
    #[case(nameserver_group(false, &["a.com", "b.example.org."]))]
    fn valid_nameserver_groups(#[case] group: NameserverGroupConfig) {
        group.validate().unwrap();
    }

    #[test]
    fn first_violation_wins() {
        // Violates the primary/domains invariant and has no nameservers.
        let group = NameserverGroupConfig {
            nameservers: ListValue::Known(Vec::new()),
            search_domains_enabled: Value::Known(true),
            ..nameserver_group(true, &["a.com"])
        };
        assert!(matches!(group.validate(), Err(Error::PrimaryWithDomains)));
    }

    #[test]
    fn search_domains_on_primary() {
        let group = NameserverGroupConfig {
            search_domains_enabled: Value::Known(true),
            ..nameserver_group(true, &[])
        };
        assert!(matches!(
            group.validate(),
            Err(Error::SearchDomainsOnPrimary)
        ));
    }

    #[test]
    fn unknown_primary_skips_dependent_invariants() {
        let group = NameserverGroupConfig {
            primary: Value::Unknown,
            search_domains_enabled: Value::Known(true),
            ..nameserver_group(false, &["a.com"])
        };
        group.validate().unwrap();
    }

    #[rstest]
    #[case(0)]
    #[case(65536)]
    fn nameserver_port_out_of_range(#[case] port: i64) {
        let group = NameserverGroupConfig {
            nameservers: ListValue::Known(vec![nameserver(53), nameserver(port)]),
            ..nameserver_group(true, &[])
        };
        assert!(matches!(
            group.validate(),
            Err(Error::InvalidNameserverPort { index: 1, .. })
        ));
    }

    #[test]
    fn invalid_match_domain() {
        let group = nameserver_group(false, &["a.com", "-bad-.com"]);
        let err = group.validate().unwrap_err();
        assert!(err.to_string().starts_with(r#"domains.1: "-bad-.com" is not a valid domain"#));
    }

    fn rule(protocol: Protocol) -> PolicyRuleConfig {
        PolicyRuleConfig {
            name: known("ssh"),
            protocol: Value::Known(protocol),
            sources: EndpointConfig::from_groups(["g1"]),
            destinations: EndpointConfig::from_groups(["g2"]),
            ..Default::default()
        }
    }

    fn policy(rules: Vec<PolicyRuleConfig>) -> PolicyConfig {
        PolicyConfig {
            name: known("default"),
            enabled: Value::Known(true),
            rules: ListValue::Known(rules),
            ..Default::default()
        }
    }

    #[test]
    fn conflicting_rule_endpoint() {
        let mut conflicting = rule(Protocol::All);
        conflicting.destinations.resource = EndpointConfig::from_resource(
            "r1",
            ResourceKind::Host,
        )
        .resource;

        let err = policy(vec![rule(Protocol::All), conflicting])
            .validate()
            .unwrap_err();
        assert!(matches!(&err, Error::ConflictingEndpoint { .. }));
        assert_eq!(
            err.to_string(),
            concat!(
                "rules.1.destinations: a group list and a resource are both set, ",
                "but at most one of them is allowed"
            )
        );
    }

    #[test]
    fn empty_group_list_next_to_resource_is_not_a_conflict() {
        let mut endpoint_rule = rule(Protocol::All);
        endpoint_rule.sources = EndpointConfig {
            groups: ListValue::Known(Vec::new()),
            ..EndpointConfig::from_resource("r1", ResourceKind::Subnet)
        };
        policy(vec![endpoint_rule]).validate().unwrap();
    }

    #[rstest]
    #[case(Protocol::Tcp, true)]
    #[case(Protocol::Udp, true)]
    #[case(Protocol::Icmp, false)]
    #[case(Protocol::All, false)]
    fn ports_require_tcp_or_udp(#[case] protocol: Protocol, #[case] valid: bool) {
        let mut port_rule = rule(protocol);
        port_rule.ports = ListValue::Known(vec!["22".to_owned()]);

        let result = policy(vec![port_rule]).validate();
        if valid {
            result.unwrap();
        } else {
            assert!(matches!(result, Err(Error::PortsWithoutPortProtocol { .. })));
        }
    }

    #[test]
    fn reversed_port_range() {
        let mut range_rule = rule(Protocol::Tcp);
        range_rule.port_ranges = ListValue::Known(vec![RulePortRange {
            start: 9000,
            end: 8000,
        }]);

        let err = policy(vec![range_rule]).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "rules.0.port_ranges.0: port range 9000-8000 ends before it starts"
        );
    }

    fn route(network: Value<String>, domains: ListValue<String>) -> RouteConfig {
        RouteConfig {
            network_id: known("office"),
            peer: known("p1"),
            network,
            domains,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(known("10.0.0.0/8"), ListValue::Null)]
    #[case(Value::Null, ListValue::Known(vec!["example.com".to_owned()]))]
    #[case(Value::Unknown, ListValue::Known(vec!["example.com".to_owned()]))]
    fn valid_routes(#[case] network: Value<String>, #[case] domains: ListValue<String>) {
        route(network, domains).validate().unwrap();
    }

    #[test]
    fn route_network_and_domains() {
        let route = route(
            known("10.0.0.0/8"),
            ListValue::Known(vec!["example.com".to_owned()]),
        );
        assert!(matches!(route.validate(), Err(Error::NetworkAndDomains)));
    }

    #[test]
    fn route_without_network_or_domains() {
        let route = route(Value::Null, ListValue::Known(Vec::new()));
        assert!(matches!(
            route.validate(),
            Err(Error::NeitherNetworkNorDomains)
        ));
    }

    #[test]
    fn route_peer_and_peer_groups() {
        let route = RouteConfig {
            peer_groups: ["pg1".to_owned()].into_iter().collect(),
            ..route(known("10.0.0.0/8"), ListValue::Null)
        };
        assert!(matches!(route.validate(), Err(Error::PeerAndPeerGroups)));

        let route = RouteConfig {
            peer: Value::Null,
            ..route
        };
        route.validate().unwrap();

        let route = RouteConfig {
            peer_groups: SetValue::Known(BTreeSet::new()),
            ..route
        };
        assert!(matches!(
            route.validate(),
            Err(Error::NeitherPeerNorPeerGroups)
        ));
    }

    #[test]
    fn posture_version_must_be_semver() {
        let mut posture = PostureCheckConfig {
            name: known("nb version"),
            checks: ChecksConfig {
                nb_version: Value::Known(VersionCheckConfig {
                    min_version: known("0.28.0"),
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        posture.validate().unwrap();

        posture.checks.nb_version = Value::Known(VersionCheckConfig {
            min_version: known("latest"),
        });
        let err = posture.validate().unwrap_err();
        assert!(matches!(&err, Error::InvalidVersion { .. }));
        assert!(
            err.to_string()
                .starts_with("checks.nb_version_check.min_version:")
        );
    }

    #[test]
    fn posture_country_codes() {
        let posture = PostureCheckConfig {
            name: known("geo"),
            checks: ChecksConfig {
                geo_location: Value::Known(GeoLocationCheckConfig {
                    locations: ListValue::Known(vec![
                        LocationConfig {
                            country_code: known("DE"),
                            city_name: Value::Null,
                        },
                        LocationConfig {
                            country_code: known("germany"),
                            city_name: Value::Null,
                        },
                    ]),
                    action: Value::Known(CheckAction::Allow),
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = posture.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"checks.geo_location_check.locations.1.country_code: "germany" is not a two-letter uppercase country code"#
        );
    }
}
