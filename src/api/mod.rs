// API module entry
// Dispatches movie requests from the route table to their handlers

mod handlers;
mod response;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::error::Error;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::routing::{self, Endpoint, RouteMatch, ROUTES};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
{
    let max_body_size = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Ok(resp);
    }

    let (endpoint, params) = match routing::match_request(req.method(), req.uri().path(), &ROUTES)
    {
        RouteMatch::Matched { endpoint, params } => (endpoint, params),
        RouteMatch::MethodNotAllowed { allowed } => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method(),
                req.uri().path()
            ));
            return Ok(http::build_405_response(&allowed));
        }
        RouteMatch::NotFound => return Ok(http::build_404_response()),
    };

    let store = &state.movies;
    let id = params.get("id").unwrap_or_default();

    match endpoint {
        Endpoint::ListMovies => handlers::list_movies(store).await,
        Endpoint::GetMovie => handlers::get_movie(store, id).await,
        Endpoint::CreateMovie => match read_body(req.into_body(), max_body_size).await {
            Ok(body) => handlers::create_movie(store, &body).await,
            Err(resp) => Ok(resp),
        },
        Endpoint::UpdateMovie => match read_body(req.into_body(), max_body_size).await {
            Ok(body) => handlers::update_movie(store, id, &body).await,
            Err(resp) => Ok(resp),
        },
        Endpoint::DeleteMovie => handlers::delete_movie(store, id).await,
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect a request body up to `max_body_size` bytes
///
/// Exceeding the limit yields a 413 response. Any other read failure is
/// treated as an empty body, which the handlers decode as a zero-valued movie.
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Ok(Bytes::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::movies::MovieStore;
    use crate::movies::Movie;
    use hyper::body::Frame;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use hyper::{Method, StatusCode};
    use serde_json::{json, Value};
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Request body whose first read fails
    struct FailingBody;

    impl Body for FailingBody {
        type Data = Bytes;
        type Error = io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
            Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "client went away",
            ))))
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&Config::default(), MovieStore::seeded()))
    }

    async fn send_request(
        state: &Arc<AppState>,
        req: Request<Full<Bytes>>,
    ) -> (StatusCode, Response<Bytes>) {
        let resp = handle_request(req, Arc::clone(state)).await.unwrap();
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (parts.status, Response::from_parts(parts, bytes))
    }

    async fn send(state: &Arc<AppState>, method: Method, path: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();
        let (status, resp) = send_request(state, req).await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert!(resp.body().ends_with(b"\n"));
        (status, serde_json::from_slice(resp.body()).unwrap())
    }

    fn ids(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect()
    }

    fn empty_movie() -> Value {
        json!({"id": "", "isbn": "", "title": "", "director": null})
    }

    #[tokio::test]
    async fn test_list_seeded_movies() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": "1", "isbn": "438227", "title": "Movie One",
                 "director": {"firstname": "John", "lastname": "Doe"}},
                {"id": "2", "isbn": "45455", "title": "Movie Two",
                 "director": {"firstname": "Steve", "lastname": "Smith"}}
            ])
        );
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let state = Arc::new(AppState::new(&Config::default(), MovieStore::new(Vec::new())));
        let (status, body) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = test_state();
        let (status, created) = send(
            &state,
            Method::POST,
            "/movies",
            r#"{"id":"ignored","isbn":"X","title":"T","director":{"firstname":"A","lastname":"B"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert_ne!(id, "ignored");

        let (status, fetched) = send(&state, Method::GET, &format!("/movies/{id}"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["isbn"], "X");
        assert_eq!(fetched["title"], "T");
        assert_eq!(fetched["director"], json!({"firstname": "A", "lastname": "B"}));

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(ids(&list).last().copied(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_get_missing_returns_empty_movie() {
        let state = test_state();
        for _ in 0..2 {
            let (status, body) = send(&state, Method::GET, "/movies/does-not-exist", "").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, empty_movie());
        }
    }

    #[tokio::test]
    async fn test_update_moves_record_to_end() {
        let state = test_state();
        let (status, updated) = send(
            &state,
            Method::PUT,
            "/movies/1",
            r#"{"id":"77","isbn":"438227","title":"Movie One Redux"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], "1");
        assert_eq!(updated["title"], "Movie One Redux");
        assert_eq!(updated["director"], Value::Null);

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(ids(&list), vec!["2", "1"]);
        assert_eq!(list[1]["title"], "Movie One Redux");
    }

    #[tokio::test]
    async fn test_update_missing_returns_empty_movie() {
        let state = test_state();
        let (status, body) = send(&state, Method::PUT, "/movies/9", r#"{"title":"New"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, empty_movie());

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(ids(&list), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_update_malformed_body_keeps_id() {
        let state = test_state();
        let (_, updated) = send(&state, Method::PUT, "/movies/2", "{oops").await;
        assert_eq!(
            updated,
            json!({"id": "2", "isbn": "", "title": "", "director": null})
        );
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let state = test_state();
        let (status, body) = send(&state, Method::DELETE, "/movies/1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["2"]);

        let (status, body) = send(&state, Method::DELETE, "/movies/1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["2"]);
    }

    #[tokio::test]
    async fn test_create_with_empty_body() {
        let state = test_state();
        let (status, created) = send(&state, Method::POST, "/movies", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert_eq!(created["isbn"], "");
        assert_eq!(created["title"], "");
        assert_eq!(created["director"], Value::Null);

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(list.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let state = test_state();
        let req = Request::builder()
            .uri("/movies/1/cast")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, resp) = send_request(&state, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body().as_ref(), b"404 page not found\n");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::PATCH)
            .uri("/movies")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, resp) = send_request(&state, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, POST");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = Config::default();
        config.http.max_body_size = 8;
        let state = Arc::new(AppState::new(&config, MovieStore::seeded()));

        let declared = Request::builder()
            .method(Method::POST)
            .uri("/movies")
            .header("content-length", "64")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, _) = send_request(&state, declared).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let undeclared = Request::builder()
            .method(Method::POST)
            .uri("/movies")
            .body(Full::new(Bytes::from(r#"{"title":"far too long"}"#)))
            .unwrap();
        let (status, _) = send_request(&state, undeclared).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_encoded_id_is_decoded_before_lookup() {
        let store = MovieStore::new(vec![Movie::new("a b", "1", "Spaced", None)]);
        let state = Arc::new(AppState::new(&Config::default(), store));

        let (status, body) = send(&state, Method::GET, "/movies/a%20b", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "a b");
        assert_eq!(body["title"], "Spaced");

        let (_, list) = send(&state, Method::DELETE, "/movies/a%20b", "").await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_unreadable_body_creates_empty_movie() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/movies")
            .body(FailingBody)
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let created: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert_eq!(created["isbn"], "");
        assert_eq!(created["title"], "");
        assert_eq!(created["director"], Value::Null);

        let (_, list) = send(&state, Method::GET, "/movies", "").await;
        assert_eq!(list.as_array().unwrap().len(), 3);
    }
}
