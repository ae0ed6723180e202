use crate::{
    api::{Peer, PeerRequest},
    convert::{self, Field, ids_to_config, optional_to_config, required_to_remote},
    selector::{Criteria, Selector},
    value::{SetValue, Value, merge::impl_merge},
};

use super::Resource;

type Result<T, E = convert::Error> = std::result::Result<T, E>;

/// A peer. Peers are registered by their own agent, so only a few attributes are writable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PeerConfig {
    pub id: Value<String>,
    pub name: Value<String>,
    pub ip: Value<String>,
    pub dns_label: Value<String>,
    pub hostname: Value<String>,
    pub connected: Value<bool>,
    pub ssh_enabled: Value<bool>,
    pub login_expiration_enabled: Value<bool>,
    pub os: Value<String>,
    pub version: Value<String>,
    pub groups: SetValue<String>,
}

impl_merge!(PeerConfig {
    id,
    name,
    ip,
    dns_label,
    hostname,
    connected,
    ssh_enabled,
    login_expiration_enabled,
    os,
    version,
    groups,
});

impl Resource for PeerConfig {
    type Remote = Peer;
    type Request = PeerRequest;

    const KIND: &'static str = "peer";

    fn from_remote(peer: &Peer) -> Result<Self> {
        let root = Field::root();
        Ok(Self {
            id: Value::Known(peer.id.clone()),
            name: Value::Known(peer.name.clone()),
            ip: Value::Known(peer.ip.clone()),
            dns_label: Value::Known(peer.dns_label.clone()),
            hostname: Value::Known(peer.hostname.clone()),
            connected: Value::Known(peer.connected),
            ssh_enabled: Value::Known(peer.ssh_enabled),
            login_expiration_enabled: Value::Known(peer.login_expiration_enabled),
            os: optional_to_config(peer.os.as_ref()),
            version: optional_to_config(peer.version.as_ref()),
            groups: ids_to_config(peer.groups.as_deref(), root.field(&"groups"))?,
        })
    }

    fn to_request(&self) -> Result<PeerRequest> {
        let root = Field::root();
        Ok(PeerRequest {
            name: required_to_remote(&self.name, root.field(&"name"))?,
            ssh_enabled: required_to_remote(&self.ssh_enabled, root.field(&"ssh_enabled"))?,
            login_expiration_enabled: required_to_remote(
                &self.login_expiration_enabled,
                root.field(&"login_expiration_enabled"),
            )?,
        })
    }
}

/// Looks up a peer by any of its unique attributes.
#[derive(Clone, Debug, Default)]
pub struct PeerSelector {
    pub id: Value<String>,
    pub name: Value<String>,
    pub ip: Value<String>,
    pub dns_label: Value<String>,
    pub hostname: Value<String>,
}

impl Selector for PeerSelector {
    type Entity = Peer;

    const KIND: &'static str = PeerConfig::KIND;

    fn criteria(&self) -> Criteria<'_, Peer> {
        Criteria::new(Self::KIND)
            .field("id", &self.id, |peer: &Peer| Some(&peer.id))
            .field("name", &self.name, |peer: &Peer| Some(&peer.name))
            .field("ip", &self.ip, |peer: &Peer| Some(&peer.ip))
            .field("dns_label", &self.dns_label, |peer: &Peer| Some(&peer.dns_label))
            .field("hostname", &self.hostname, |peer: &Peer| Some(&peer.hostname))
    }
}
