//! The provider context handed to every resource and data-source handler.
//!
//! It is constructed once at startup from a [`ProviderConfig`] and a client, and passed by
//! reference from there on. Nothing in this crate keeps provider state of its own.
use std::sync::LazyLock;

use meshform_telemetry::TelemetryOptions;
use serde::Deserialize;
use snafu::ResultExt as _;
use url::Url;

use crate::{
    error::{ClientSnafu, Error},
    model::Resource,
    selector::{Selector, resolve},
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// The environment variable the log filter is read from, for example `MESHFORM_LOG=debug`.
pub const LOG_ENV_VAR: &str = "MESHFORM_LOG";

pub const APP_NAME: &str = "meshform";

const DEFAULT_MANAGEMENT_URL_STR: &str = "https://api.netbird.io";

static DEFAULT_MANAGEMENT_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(DEFAULT_MANAGEMENT_URL_STR).expect("failed to parse default management URL")
});

fn default_management_url() -> Url {
    DEFAULT_MANAGEMENT_URL.clone()
}

/// Provider-level settings, read from CLI arguments and environment variables or from a
/// deserialized provider block.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the management API.
    #[cfg_attr(
        feature = "clap",
        arg(long, env = "MESHFORM_MANAGEMENT_URL", default_value = DEFAULT_MANAGEMENT_URL_STR)
    )]
    #[serde(default = "default_management_url")]
    pub management_url: Url,

    /// Access token used to authenticate against the management API.
    #[cfg_attr(
        feature = "clap",
        arg(long, env = "MESHFORM_TOKEN", hide_env_values = true)
    )]
    #[serde(default)]
    pub token: Option<String>,

    #[cfg_attr(feature = "clap", command(flatten))]
    #[serde(skip)]
    pub telemetry: TelemetryOptions,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            management_url: default_management_url(),
            token: None,
            telemetry: TelemetryOptions::default(),
        }
    }
}

impl ProviderConfig {
    /// Initializes logging as configured by [`ProviderConfig::telemetry`].
    pub fn initialize_logging(&self) -> Result<(), meshform_telemetry::Error> {
        meshform_telemetry::initialize_logging(LOG_ENV_VAR, APP_NAME, &self.telemetry)
    }
}

/// Read access to the remote entities of type `E`.
///
/// This is the only part of the management API client the core depends on.
pub trait Catalog<E> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list(&self) -> Result<Vec<E>, Self::Error>;

    fn get(&self, id: &str) -> Result<E, Self::Error>;
}

/// Everything a handler needs: the provider settings and the management API client.
#[derive(Debug)]
pub struct ProviderContext<C> {
    config: ProviderConfig,
    client: C,
}

impl<C> ProviderContext<C> {
    pub fn new(config: ProviderConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Lists all entities and resolves the one identified by `selector`.
    ///
    /// An empty selector is rejected before the client is asked for anything.
    pub fn lookup<S>(&self, selector: &S) -> Result<S::Entity>
    where
        S: Selector,
        C: Catalog<S::Entity>,
    {
        let criteria = selector.criteria();
        criteria.check_populated()?;

        let entities = self.client.list().boxed().context(ClientSnafu {
            kind: S::KIND,
            operation: "list",
        })?;
        Ok(resolve(entities, &criteria)?)
    }

    /// Looks up an entity like [`ProviderContext::lookup`] and decodes it into its
    /// configuration model.
    pub fn read_data_source<S, R>(&self, selector: &S) -> Result<R>
    where
        S: Selector<Entity = R::Remote>,
        R: Resource,
        C: Catalog<R::Remote>,
    {
        let remote = self.lookup(selector)?;
        Ok(R::from_remote(&remote)?)
    }

    /// Reads a single entity by identifier and decodes it into its configuration model.
    pub fn read<R>(&self, id: &str) -> Result<R>
    where
        R: Resource,
        C: Catalog<R::Remote>,
    {
        let remote = self.client.get(id).boxed().context(ClientSnafu {
            kind: R::KIND,
            operation: "get",
        })?;
        Ok(R::from_remote(&remote)?)
    }
}
