//! Query, filter and pagination controller for an organisation's software and
//! project listings served by a PostgREST backend.

pub mod api;
pub mod api_client;
pub mod config;
pub mod debounce;
pub mod directory;
pub mod error;
pub mod facets;
pub mod render;
pub mod results;
pub mod scroll;

#[cfg(test)]
mod mock_transport;

pub use api_client::{ApiClient, ReqwestTransport, Transport};
pub use directory::Directory;
pub use error::ApiError;
