// Movie collection store
// Owns the ordered in-memory collection and the id generator

use rand::Rng;
use tokio::sync::RwLock;

use super::model::{Director, Movie};

/// Upper bound (exclusive) for generated ids
const ID_RANGE: u32 = 10_000_000;

/// Function producing a fresh record id
pub type IdSource = fn() -> String;

/// Draw a pseudo-random id in `[0, ID_RANGE)`
///
/// Not checked against existing records; collisions are possible.
pub fn random_id() -> String {
    rand::thread_rng().gen_range(0..ID_RANGE).to_string()
}

/// Ordered collection of movies shared by all requests
///
/// Each operation runs its whole scan-and-splice under a single lock
/// acquisition. Order is insertion order; `update` moves the record to the end.
pub struct MovieStore {
    movies: RwLock<Vec<Movie>>,
    next_id: IdSource,
}

impl MovieStore {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self::with_id_source(movies, random_id)
    }

    pub fn with_id_source(movies: Vec<Movie>, next_id: IdSource) -> Self {
        Self {
            movies: RwLock::new(movies),
            next_id,
        }
    }

    /// Store holding the two records present at process start
    pub fn seeded() -> Self {
        Self::new(seed_movies())
    }

    /// Snapshot of the whole collection in its current order
    pub async fn list(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    /// First record whose id matches
    pub async fn get(&self, id: &str) -> Option<Movie> {
        self.movies
            .read()
            .await
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
    }

    /// Append a record under a freshly generated id, discarding any id it carried
    pub async fn create(&self, mut movie: Movie) -> Movie {
        movie.id = (self.next_id)();
        self.movies.write().await.push(movie.clone());
        movie
    }

    /// Replace the first record matching `id` and move it to the end
    ///
    /// The replacement keeps `id` regardless of what it carried. Returns
    /// `None` and leaves the collection untouched when nothing matches.
    pub async fn update(&self, id: &str, mut movie: Movie) -> Option<Movie> {
        let mut movies = self.movies.write().await;
        let index = movies.iter().position(|m| m.id == id)?;
        movies.remove(index);
        movie.id = id.to_string();
        movies.push(movie.clone());
        Some(movie)
    }

    /// Remove the first record matching `id`, returning the remaining collection
    pub async fn delete(&self, id: &str) -> Vec<Movie> {
        let mut movies = self.movies.write().await;
        if let Some(index) = movies.iter().position(|m| m.id == id) {
            movies.remove(index);
        }
        movies.clone()
    }
}

fn seed_movies() -> Vec<Movie> {
    vec![
        Movie::new("1", "438227", "Movie One", Some(Director::new("John", "Doe"))),
        Movie::new("2", "45455", "Movie Two", Some(Director::new("Steve", "Smith"))),
    ]
}
