use crate::{
    api::{Route, RouteRequest},
    convert::{
        self, Field, list_to_config, list_to_remote, optional_to_config, optional_to_remote,
        required_set_to_remote, required_to_remote, set_to_config, set_to_remote,
    },
    selector::{Criteria, Selector},
    value::{ListValue, SetValue, Value, merge::impl_merge},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

/// A network route, towards either a network range or a list of domains.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteConfig {
    pub id: Value<String>,
    pub description: Value<String>,
    pub network_id: Value<String>,
    pub enabled: Value<bool>,
    pub peer: Value<String>,
    pub peer_groups: SetValue<String>,
    pub network: Value<String>,
    /// Domain order is significant, it decides resolution precedence.
    pub domains: ListValue<String>,
    pub metric: Value<i64>,
    pub masquerade: Value<bool>,
    pub groups: SetValue<String>,
    pub keep_route: Value<bool>,
    pub access_control_groups: SetValue<String>,
    pub network_type: Value<String>,
}

impl_merge!(RouteConfig {
    id,
    description,
    network_id,
    enabled,
    peer,
    peer_groups,
    network,
    domains,
    metric,
    masquerade,
    groups,
    keep_route,
    access_control_groups,
    network_type,
});

impl Resource for RouteConfig {
    type Remote = Route;
    type Request = RouteRequest;

    const KIND: &'static str = "route";

    fn from_remote(route: &Route) -> Result<Self> {
        Ok(Self {
            id: Value::Known(route.id.clone()),
            description: optional_to_config(route.description.as_ref()),
            network_id: Value::Known(route.network_id.clone()),
            enabled: Value::Known(route.enabled),
            peer: optional_to_config(route.peer.as_ref()),
            peer_groups: set_to_config(route.peer_groups.as_deref()),
            network: optional_to_config(route.network.as_ref()),
            domains: list_to_config(route.domains.as_deref()),
            metric: Value::Known(route.metric),
            masquerade: Value::Known(route.masquerade),
            groups: set_to_config(Some(route.groups.as_slice())),
            keep_route: Value::Known(route.keep_route),
            access_control_groups: set_to_config(route.access_control_groups.as_deref()),
            network_type: optional_to_config(route.network_type.as_ref()),
        })
    }

    fn to_request(&self) -> Result<RouteRequest> {
        let root = Field::root();
        Ok(RouteRequest {
            description: optional_to_remote(&self.description, root.field(&"description"))?,
            network_id: required_to_remote(&self.network_id, root.field(&"network_id"))?,
            enabled: required_to_remote(&self.enabled, root.field(&"enabled"))?,
            peer: optional_to_remote(&self.peer, root.field(&"peer"))?,
            peer_groups: set_to_remote(&self.peer_groups, root.field(&"peer_groups"))?,
            network: optional_to_remote(&self.network, root.field(&"network"))?,
            domains: list_to_remote(&self.domains, root.field(&"domains"))?,
            metric: required_to_remote(&self.metric, root.field(&"metric"))?,
            masquerade: required_to_remote(&self.masquerade, root.field(&"masquerade"))?,
            groups: required_set_to_remote(&self.groups, root.field(&"groups"))?,
            keep_route: required_to_remote(&self.keep_route, root.field(&"keep_route"))?,
            access_control_groups: set_to_remote(
                &self.access_control_groups,
                root.field(&"access_control_groups"),
            )?,
        })
    }
}

/// Looks up a route by identifier, network identifier or network range.
#[derive(Clone, Debug, Default)]
pub struct RouteSelector {
    pub id: Value<String>,
    pub network_id: Value<String>,
    pub network: Value<String>,
}

impl Selector for RouteSelector {
    type Entity = Route;

    const KIND: &'static str = RouteConfig::KIND;

    fn criteria(&self) -> Criteria<'_, Route> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |route: &Route| Some(&route.id))
            .field("network_id", &self.network_id, |route: &Route| {
                Some(&route.network_id)
            })
            .field("network", &self.network, |route: &Route| route.network.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const NETWORK_ROUTE: &str = indoc! {r#"
        {
          "id": "rt1",
          "description": "office",
          "network_id": "office-net",
          "enabled": true,
          "peer": "p1",
          "peer_groups": null,
          "network": "10.10.0.0/16",
          "domains": null,
          "metric": 9999,
          "masquerade": true,
          "groups": ["g1", "g2"],
          "keep_route": false,
          "access_control_groups": null,
          "network_type": "IPv4"
        }
    "#};

    #[test]
    fn network_route_keeps_null_domains() {
        let route: Route = serde_json::from_str(NETWORK_ROUTE).unwrap();
        let config = RouteConfig::from_remote(&route).unwrap();

        assert_eq!(config.domains, ListValue::Null);
        assert_eq!(config.network, Value::Known("10.10.0.0/16".to_owned()));

        let request = config.to_request().unwrap();
        assert_eq!(request.domains, None);
        assert_eq!(request.network, route.network);
        assert_eq!(request.peer_groups, None);
        assert_eq!(request.groups, route.groups);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["domains"], serde_json::Value::Null);
    }

    #[test]
    fn domain_route_preserves_domain_order() {
        let route = Route {
            network: None,
            domains: Some(vec!["b.example.com".to_owned(), "a.example.com".to_owned()]),
            network_type: Some("Domain".to_owned()),
            ..serde_json::from_str(NETWORK_ROUTE).unwrap()
        };

        let request = RouteConfig::from_remote(&route)
            .unwrap()
            .to_request()
            .unwrap();
        assert_eq!(request.network, None);
        assert_eq!(request.domains, route.domains);
    }

    #[test]
    fn select_by_network() {
        let route: Route = serde_json::from_str(NETWORK_ROUTE).unwrap();
        let filter = RouteSelector {
            network: Value::Known("10.10.0.0/16".to_owned()),
            ..Default::default()
        };

        assert_eq!(filter.resolve([route.clone()]), Ok(route));
    }
}
