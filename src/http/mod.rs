//! HTTP protocol layer module
//!
//! Response builders for transport-level outcomes (unknown route, wrong
//! method, oversized body), independent of the movie handlers.

pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, build_405_response, build_413_response, set_server_header};
