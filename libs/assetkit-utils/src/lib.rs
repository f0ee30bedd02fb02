#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Small building blocks shared by the `assetkit-*` crates and the
//! hello-asset service.

pub mod humantime_serde;
mod secret_string;

pub use secret_string::SecretString;
