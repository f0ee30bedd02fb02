#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Asset service connectivity probe.
//!
//! Resolves the platform service bindings once at startup into a
//! [`domain::bindings::ProbeContext`], then serves:
//! - `GET /info`: the discovered [`domain::models::ServiceDescriptor`] as JSON
//! - `GET /ping`: the round-trip workflow, rendered as plain text
//!
//! The workflow re-provisions a UAA client, fetches a token for it, posts a
//! sample asset record and looks for it in the asset listing.

pub mod api;
pub mod config;
pub mod domain;

pub use api::rest::router;
pub use config::{PlatformConfig, ProbeConfig, ProbeHttpConfig};
pub use domain::bindings::{BindingError, ProbeContext, resolve};
pub use domain::outcome::ProbeOutcome;
pub use domain::service::ProbeService;
