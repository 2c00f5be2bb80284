// Movie record types
// Defines the JSON shape served by the movies API

use serde::de::DeserializeSeed;
use serde::Serialize;

use super::decode::MergeInto;

/// Director embedded in a movie record
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Director {
    pub firstname: String,
    pub lastname: String,
}

/// Movie record
///
/// `director` serializes as `null` when absent. Request bodies are read
/// through `decode_or_default`, never through a strict `Deserialize`.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Movie {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub director: Option<Director>,
}

impl Movie {
    pub fn new(id: &str, isbn: &str, title: &str, director: Option<Director>) -> Self {
        Self {
            id: id.to_string(),
            isbn: isbn.to_string(),
            title: title.to_string(),
            director,
        }
    }

    /// Sentinel returned in place of a not-found error
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a request body, substituting the zero-valued movie on failure
    ///
    /// Only the first JSON value in the body is read; anything after it is
    /// ignored. Keys match fields ignoring ASCII case and a repeated key keeps
    /// its last value. A field holding the wrong JSON type is skipped while the
    /// other fields are kept. Empty, malformed or non-object bodies yield
    /// `Movie::empty()`, even if some keys were read before the error.
    pub fn decode_or_default(body: &[u8]) -> Self {
        let mut movie = Self::empty();
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        match MergeInto(&mut movie).deserialize(&mut deserializer) {
            Ok(()) => movie,
            Err(_) => Self::empty(),
        }
    }
}

impl Director {
    pub fn new(firstname: &str, lastname: &str) -> Self {
        Self {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        }
    }
}
