//! Route table for the movies API

use hyper::Method;

/// Handler a matched route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListMovies,
    GetMovie,
    CreateMovie,
    UpdateMovie,
    DeleteMovie,
}

/// A registered method + path template
#[derive(Debug)]
pub struct Route {
    pub method: Method,
    /// Literal segments and `{name}` placeholders, e.g. "/movies/{id}"
    pub template: &'static str,
    pub endpoint: Endpoint,
}

/// Registered routes, tried in order
pub static ROUTES: [Route; 5] = [
    Route {
        method: Method::GET,
        template: "/movies",
        endpoint: Endpoint::ListMovies,
    },
    Route {
        method: Method::GET,
        template: "/movies/{id}",
        endpoint: Endpoint::GetMovie,
    },
    Route {
        method: Method::POST,
        template: "/movies",
        endpoint: Endpoint::CreateMovie,
    },
    Route {
        method: Method::PUT,
        template: "/movies/{id}",
        endpoint: Endpoint::UpdateMovie,
    },
    Route {
        method: Method::DELETE,
        template: "/movies/{id}",
        endpoint: Endpoint::DeleteMovie,
    },
];
