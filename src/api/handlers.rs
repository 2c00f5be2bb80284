// Movie handlers module
//
// Every handler answers 200 with a JSON body. A missing id yields the empty
// movie and an undecodable body yields a zero-valued movie; neither is an error.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::convert::Infallible;

use super::response::json_response;
use crate::logger;
use crate::movies::{Movie, MovieStore};

type HandlerResult = Result<Response<Full<Bytes>>, Infallible>;

/// GET /movies
pub async fn list_movies(store: &MovieStore) -> HandlerResult {
    let movies = store.list().await;
    json_response(StatusCode::OK, &movies)
}

/// GET /movies/{id}
pub async fn get_movie(store: &MovieStore, id: &str) -> HandlerResult {
    let movie = store.get(id).await.unwrap_or_else(|| {
        logger::log_debug(&format!("[Movies] No movie with id {id:?}"));
        Movie::empty()
    });
    json_response(StatusCode::OK, &movie)
}

/// POST /movies
pub async fn create_movie(store: &MovieStore, body: &[u8]) -> HandlerResult {
    let created = store.create(Movie::decode_or_default(body)).await;
    logger::log_debug(&format!("[Movies] Created movie {}", created.id));
    json_response(StatusCode::OK, &created)
}

/// PUT /movies/{id}
pub async fn update_movie(store: &MovieStore, id: &str, body: &[u8]) -> HandlerResult {
    let movie = match store.update(id, Movie::decode_or_default(body)).await {
        Some(updated) => {
            logger::log_debug(&format!("[Movies] Updated movie {id}"));
            updated
        }
        None => {
            logger::log_debug(&format!("[Movies] No movie with id {id:?} to update"));
            Movie::empty()
        }
    };
    json_response(StatusCode::OK, &movie)
}

/// DELETE /movies/{id}
pub async fn delete_movie(store: &MovieStore, id: &str) -> HandlerResult {
    let remaining = store.delete(id).await;
    logger::log_debug(&format!(
        "[Movies] Delete {id:?}: {} movies remain",
        remaining.len()
    ));
    json_response(StatusCode::OK, &remaining)
}
