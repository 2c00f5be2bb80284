//! Route matching module
//!
//! Matches a request path segment by segment against route templates.

use hyper::Method;
use percent_encoding::percent_decode_str;

use super::table::{Endpoint, Route};

/// Path parameters captured from `{name}` template segments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathParams(Vec<(&'static str, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of matching a request against the route table
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch {
    Matched {
        endpoint: Endpoint,
        params: PathParams,
    },
    /// Path matched at least one template, but none with this method
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// Find the first route whose method and template match
///
/// `raw_path` is percent-decoded as a whole before matching, so an encoded
/// `%2F` separates segments just like a literal `/`.
pub fn match_request(method: &Method, raw_path: &str, routes: &[Route]) -> RouteMatch {
    let path = percent_decode_str(raw_path).decode_utf8_lossy();
    let mut allowed = Vec::new();

    for route in routes {
        let Some(params) = match_template(route.template, &path) else {
            continue;
        };
        if route.method == *method {
            return RouteMatch::Matched {
                endpoint: route.endpoint,
                params,
            };
        }
        if !allowed.contains(&route.method) {
            allowed.push(route.method.clone());
        }
    }

    if allowed.is_empty() {
        RouteMatch::NotFound
    } else {
        RouteMatch::MethodNotAllowed { allowed }
    }
}

/// Match a path against a template, capturing placeholder segments
///
/// A placeholder matches exactly one non-empty segment; literal segments
/// must match exactly, so trailing slashes are significant.
fn match_template(template: &'static str, path: &str) -> Option<PathParams> {
    let mut pattern = template.split('/');
    let mut segments = path.split('/');
    let mut params = Vec::new();

    loop {
        match (pattern.next(), segments.next()) {
            (None, None) => return Some(PathParams(params)),
            (Some(expected), Some(actual)) => {
                if let Some(name) = placeholder(expected) {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push((name, actual.to_string()));
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

fn placeholder(segment: &'static str) -> Option<&'static str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
