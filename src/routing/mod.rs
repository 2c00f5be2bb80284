//! Routing module
//!
//! Binds (method, path template) pairs to movie endpoints and matches
//! incoming requests against them, extracting `{name}` path parameters.

mod matcher;
mod table;

pub use matcher::{match_request, RouteMatch};
pub use table::{Endpoint, ROUTES};
