pub mod asset_gateway;
pub mod bindings;
pub mod credentials;
pub mod error;
pub mod models;
pub mod outcome;
pub mod service;
pub mod token_client;
pub mod uaa_clients;
