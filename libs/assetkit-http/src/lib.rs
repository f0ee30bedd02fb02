#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP for the UAA and asset service calls.
//!
//! Each [`HttpClient`] is a pooled hyper client with rustls, a per-request
//! timeout, a default `User-Agent` and an optional auth wrapper, behind a
//! bounded request queue. Failed calls are not retried.
//!
//! ```ignore
//! use assetkit_http::{HttpClientBuilder, HttpClientConfig};
//!
//! let client = HttpClientBuilder::with_config(HttpClientConfig::default()).build()?;
//! let records: Vec<Record> = client
//!     .get("https://asset.example.com/assets")
//!     .header("predix-zone-id", "zone-1")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;
mod user_agent;

pub use builder::{HttpClientBuilder, InnerService};
pub use client::HttpClient;
pub use config::{HttpClientConfig, TransportSecurity, TrustRoots};
pub use error::{HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
