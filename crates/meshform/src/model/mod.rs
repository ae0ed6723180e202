//! Configuration models, one per managed resource.
//!
//! Each model converts from the remote entity with [`Resource::from_remote`] and into the
//! create/update payload with [`Resource::to_request`]. Data sources additionally come with a
//! selector struct that names the fields an entity can be looked up by.

use crate::{convert, validation::Validate};

pub mod dns;
pub mod group;
pub mod network;
pub mod peer;
pub mod policy;
pub mod posture;
pub mod route;

/// A configuration model of a remote entity.
pub trait Resource: Validate + Sized {
    /// The entity as returned by the remote API.
    type Remote;

    /// The create/update payload accepted by the remote API.
    type Request;

    const KIND: &'static str;

    fn from_remote(remote: &Self::Remote) -> Result<Self, convert::Error>;

    fn to_request(&self) -> Result<Self::Request, convert::Error>;
}

/// Encodes `config` into a request and checks its cross-field invariants.
///
/// Nothing is returned unless both succeed, so a request that reaches the remote API is
/// always consistent.
pub fn prepare<R: Resource>(config: &R) -> Result<R::Request, crate::Error> {
    let request = config.to_request()?;
    config.validate()?;

    tracing::trace!(resource.kind = R::KIND, "prepared request");
    Ok(request)
}
