//! Remote entity shapes as exchanged with the management API.
//!
//! Nullable remote fields are [`Option`]s. Collections where the remote system distinguishes
//! a missing (`null`) list from an empty one are `Option<Vec<_>>`; collections that are always
//! present are plain [`Vec`]s. The `*Request` types are what encoding produces for create and
//! update calls.

mod dns;
mod group;
mod network;
mod peer;
mod policy;
mod posture;
mod route;

pub use dns::*;
pub use group::*;
pub use network::*;
pub use peer::*;
pub use policy::*;
pub use posture::*;
pub use route::*;
