//! Access policies and their rules.
use crate::{
    api::{
        Policy, PolicyRequest, PolicyRule, PolicyRuleRequest, Protocol, RuleAction,
        RulePortRange,
    },
    convert::{
        self, Field, list_to_config, list_to_remote, optional_to_config, optional_to_remote,
        required_to_remote, set_to_config, set_to_remote,
    },
    selector::{Criteria, Selector},
    value::{ListValue, SetValue, Value, merge::impl_merge},
    variant::endpoint::{EndpointConfig, RemoteEndpoint, decode_endpoint, encode_endpoint},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PolicyRuleConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub enabled: Value<bool>,
    pub action: Value<RuleAction>,
    pub bidirectional: Value<bool>,
    pub protocol: Value<Protocol>,
    pub ports: ListValue<String>,
    pub port_ranges: ListValue<RulePortRange>,
    pub sources: EndpointConfig,
    pub destinations: EndpointConfig,
}

impl PolicyRuleConfig {
    fn from_remote(rule: &PolicyRule, field: Field) -> Result<Self> {
        Ok(Self {
            id: optional_to_config(rule.id.as_ref()),
            name: Value::Known(rule.name.clone()),
            description: optional_to_config(rule.description.as_ref()),
            enabled: Value::Known(rule.enabled),
            action: Value::Known(rule.action),
            bidirectional: Value::Known(rule.bidirectional),
            protocol: Value::Known(rule.protocol),
            ports: list_to_config(rule.ports.as_deref()),
            port_ranges: list_to_config(rule.port_ranges.as_deref()),
            sources: decode_endpoint(
                rule.sources.as_deref(),
                rule.source_resource.as_ref(),
                field.field(&"sources"),
            )?,
            destinations: decode_endpoint(
                rule.destinations.as_deref(),
                rule.destination_resource.as_ref(),
                field.field(&"destinations"),
            )?,
        })
    }

    fn to_remote(&self, field: Field) -> Result<PolicyRuleRequest> {
        let sources: RemoteEndpoint<String> =
            encode_endpoint(&self.sources, field.field(&"sources"))?;
        let destinations: RemoteEndpoint<String> =
            encode_endpoint(&self.destinations, field.field(&"destinations"))?;

        Ok(PolicyRuleRequest {
            id: optional_to_remote(&self.id, field.field(&"id"))?,
            name: required_to_remote(&self.name, field.field(&"name"))?,
            description: optional_to_remote(&self.description, field.field(&"description"))?,
            enabled: required_to_remote(&self.enabled, field.field(&"enabled"))?,
            action: required_to_remote(&self.action, field.field(&"action"))?,
            bidirectional: required_to_remote(&self.bidirectional, field.field(&"bidirectional"))?,
            protocol: required_to_remote(&self.protocol, field.field(&"protocol"))?,
            ports: list_to_remote(&self.ports, field.field(&"ports"))?,
            port_ranges: list_to_remote(&self.port_ranges, field.field(&"port_ranges"))?,
            sources: sources.groups,
            destinations: destinations.groups,
            source_resource: sources.resource,
            destination_resource: destinations.resource,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PolicyConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub enabled: Value<bool>,
    /// Rules are evaluated in order.
    pub rules: ListValue<PolicyRuleConfig>,
    pub source_posture_checks: SetValue<String>,
}

impl_merge!(PolicyConfig {
    id,
    name,
    description,
    enabled,
    rules,
    source_posture_checks,
});

impl Resource for PolicyConfig {
    type Remote = Policy;
    type Request = PolicyRequest;

    const KIND: &'static str = "policy";

    fn from_remote(policy: &Policy) -> Result<Self> {
        let root = Field::root();
        let rules_field = root.field(&"rules");
        let rules = policy
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| PolicyRuleConfig::from_remote(rule, rules_field.field(&index)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: Value::Known(policy.id.clone()),
            name: Value::Known(policy.name.clone()),
            description: optional_to_config(policy.description.as_ref()),
            enabled: Value::Known(policy.enabled),
            rules: ListValue::Known(rules),
            source_posture_checks: set_to_config(policy.source_posture_checks.as_deref()),
        })
    }

    fn to_request(&self) -> Result<PolicyRequest> {
        let root = Field::root();
        let rules_field = root.field(&"rules");
        let rules = match &self.rules {
            ListValue::Known(rules) => rules
                .iter()
                .enumerate()
                .map(|(index, rule)| rule.to_remote(rules_field.field(&index)))
                .collect::<Result<Vec<_>>>()?,
            ListValue::Null => return Err(rules_field.error_null()),
            ListValue::Unknown => return Err(rules_field.error_unknown()),
        };

        Ok(PolicyRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            description: optional_to_remote(&self.description, root.field(&"description"))?,
            enabled: required_to_remote(&self.enabled, root.field(&"enabled"))?,
            rules,
            source_posture_checks: set_to_remote(
                &self.source_posture_checks,
                root.field(&"source_posture_checks"),
            )?,
        })
    }
}

/// Looks up a policy by identifier or name.
#[derive(Clone, Debug, Default)]
pub struct PolicySelector {
    pub id: Value<String>,
    pub name: Value<String>,
}

impl Selector for PolicySelector {
    type Entity = Policy;

    const KIND: &'static str = PolicyConfig::KIND;

    fn criteria(&self) -> Criteria<'_, Policy> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |policy: &Policy| Some(&policy.id))
            .field("name", &self.name, |policy: &Policy| Some(&policy.name))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::api::{Resource as RemoteResource, ResourceKind};

    const POLICY: &str = indoc! {r#"
        {
          "id": "pol1",
          "name": "ssh to servers",
          "description": null,
          "enabled": true,
          "rules": [
            {
              "id": "rule1",
              "name": "ssh",
              "description": null,
              "enabled": true,
              "action": "accept",
              "bidirectional": false,
              "protocol": "tcp",
              "ports": ["22", "2222"],
              "port_ranges": null,
              "sources": [
                { "id": "g-devs", "name": "devs" },
                { "id": "g-ops", "name": "ops" }
              ],
              "destinations": [],
              "sourceResource": null,
              "destinationResource": { "id": "r-db", "type": "host" }
            }
          ],
          "source_posture_checks": null
        }
    "#};

    #[test]
    fn decode_rule_endpoints() {
        let policy: Policy = serde_json::from_str(POLICY).unwrap();
        let config = PolicyConfig::from_remote(&policy).unwrap();

        let rule = &config.rules.as_known().unwrap()[0];
        assert_eq!(rule.sources, EndpointConfig::from_groups(["g-devs", "g-ops"]));
        assert_eq!(rule.destinations, EndpointConfig {
            groups: ListValue::Known(Vec::new()),
            ..EndpointConfig::from_resource("r-db", ResourceKind::Host)
        });
        assert_eq!(
            rule.ports,
            ListValue::Known(vec!["22".to_owned(), "2222".to_owned()])
        );
    }

    #[test]
    fn encode_rule_endpoints() {
        let policy: Policy = serde_json::from_str(POLICY).unwrap();
        let request = PolicyConfig::from_remote(&policy)
            .unwrap()
            .to_request()
            .unwrap();

        let rule = &request.rules[0];
        assert_eq!(
            rule.sources,
            Some(vec!["g-devs".to_owned(), "g-ops".to_owned()])
        );
        assert_eq!(rule.destinations, Some(Vec::new()));
        assert_eq!(rule.source_resource, None);
        assert_eq!(
            rule.destination_resource,
            Some(RemoteResource {
                id: "r-db".to_owned(),
                kind: ResourceKind::Host,
            })
        );

        let json = serde_json::to_value(rule).unwrap();
        assert_eq!(json["destinationResource"]["type"], "host");
    }

    #[test]
    fn both_endpoint_siblings_is_a_conversion_error() {
        let mut policy: Policy = serde_json::from_str(POLICY).unwrap();
        policy.rules[0].source_resource = Some(RemoteResource {
            id: "r-web".to_owned(),
            kind: ResourceKind::Subnet,
        });

        let err = PolicyConfig::from_remote(&policy).unwrap_err();
        assert!(matches!(err, convert::Error::MultipleVariants { .. }));
        assert_eq!(err.field().to_string(), "rules.0.sources");
    }

    #[test]
    fn unknown_rules_are_not_encoded() {
        let config = PolicyConfig {
            name: Value::Known("p".to_owned()),
            enabled: Value::Known(true),
            rules: ListValue::Unknown,
            ..Default::default()
        };

        assert!(matches!(
            config.to_request(),
            Err(convert::Error::UnknownValue { .. })
        ));
    }
}
