//! Errors surfaced by the directory controller.

use common::{facet::FacetId, section::Section};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("unknown facet identifier: {0}")]
    UnknownFacet(String),

    #[error("facet {facet} is not enabled for {section}")]
    FacetNotEnabled { facet: FacetId, section: Section },
}

impl ApiError {
    /// Transport failures and non-success responses are one class to callers.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Status { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<common::facet::UnknownFacet> for ApiError {
    fn from(e: common::facet::UnknownFacet) -> Self {
        ApiError::UnknownFacet(e.0)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
