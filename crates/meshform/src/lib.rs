//! Core of the meshform provider, which reconciles declarative mesh network configuration
//! against a remote management API.
//!
//! The HTTP client and the configuration schema layer live outside of this crate. What is in
//! here is the layer every resource and data source shares:
//!
//! - [`selector`] picks exactly one remote entity out of a listed collection.
//! - [`convert`] translates between remote values and three-valued configuration
//!   [`value`]s, keeping null and empty collections apart.
//! - [`variant`] handles sub-structures whose siblings are alternative representations.
//! - [`validation`] rejects configurations that violate cross-field invariants before any
//!   mutating call is made.
//!
//! [`model`] ties these together per resource and [`context`] provides the entry points used
//! by handlers.
pub mod api;
pub mod context;
pub mod convert;
mod error;
pub mod model;
pub mod selector;
pub mod validation;
pub mod value;
pub mod variant;

pub use error::{Error, ErrorKind};
// External re-exports
pub use meshform_telemetry as telemetry;
