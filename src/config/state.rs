// Application state module
// Shared state handed to every connection

use super::types::Config;
use crate::movies::MovieStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub movies: MovieStore,
}

impl AppState {
    pub fn new(config: &Config, movies: MovieStore) -> Self {
        Self {
            config: config.clone(),
            movies,
        }
    }
}
