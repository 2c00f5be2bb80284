// Lenient request-body decoding
//
// Object keys are read in document order and matched to fields ignoring
// ASCII case, so a repeated key keeps its last value. A field whose value has
// the wrong JSON type is skipped without failing the rest of the record.

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;

use super::model::{Director, Movie};

/// Types whose fields can be filled one JSON key at a time
pub trait LenientFields {
    /// Consume the value for `key` from `map`, storing it if it fits
    fn set_field<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> Result<(), A::Error>;
}

/// Writes an object's keys into an existing value
pub struct MergeInto<'a, T>(pub &'a mut T);

impl<'de, T: LenientFields> DeserializeSeed<'de> for MergeInto<'_, T> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, T: LenientFields> Visitor<'de> for MergeInto<'_, T> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            self.0.set_field(&key, &mut map)?;
        }
        Ok(())
    }
}

/// Store the next value only if it is a JSON string
fn take_string<'de, A: MapAccess<'de>>(map: &mut A, slot: &mut String) -> Result<(), A::Error> {
    if let Value::String(s) = map.next_value::<Value>()? {
        *slot = s;
    }
    Ok(())
}

impl LenientFields for Movie {
    fn set_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> Result<(), A::Error> {
        match key.to_ascii_lowercase().as_str() {
            "id" => take_string(map, &mut self.id),
            "isbn" => take_string(map, &mut self.isbn),
            "title" => take_string(map, &mut self.title),
            "director" => map.next_value_seed(DirectorSlot(&mut self.director)),
            _ => map.next_value::<IgnoredAny>().map(|_| ()),
        }
    }
}

impl LenientFields for Director {
    fn set_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> Result<(), A::Error> {
        match key.to_ascii_lowercase().as_str() {
            "firstname" => take_string(map, &mut self.firstname),
            "lastname" => take_string(map, &mut self.lastname),
            _ => map.next_value::<IgnoredAny>().map(|_| ()),
        }
    }
}

/// `director` value: an object merges into the current director (creating
/// one if absent), `null` clears it, anything else leaves it unchanged.
struct DirectorSlot<'a>(&'a mut Option<Director>);

impl<'de> DeserializeSeed<'de> for DirectorSlot<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for DirectorSlot<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a director object or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        let director = self.0.get_or_insert_with(Director::default);
        MergeInto(director).visit_map(map)
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        *self.0 = None;
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.visit_unit()
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(json: &str) -> Result<Movie, serde_json::Error> {
        let mut movie = Movie::empty();
        let mut de = serde_json::Deserializer::from_str(json);
        MergeInto(&mut movie).deserialize(&mut de)?;
        Ok(movie)
    }

    #[test]
    fn test_director_null_clears_earlier_value() {
        let movie = merge(r#"{"director":{"firstname":"A"},"director":null}"#).unwrap();
        assert!(movie.director.is_none());
    }

    #[test]
    fn test_repeated_director_merges() {
        let movie =
            merge(r#"{"director":{"firstname":"A"},"Director":{"lastname":"B"}}"#).unwrap();
        assert_eq!(movie.director, Some(Director::new("A", "B")));
    }

    #[test]
    fn test_director_wrong_type_is_skipped() {
        let movie = merge(r#"{"director":{"firstname":"A"},"director":[1,{"x":2}],"title":"T"}"#)
            .unwrap();
        assert_eq!(movie.director, Some(Director::new("A", "")));
        assert_eq!(movie.title, "T");
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(merge("[1,2]").is_err());
        assert!(merge("\"title\"").is_err());
        assert!(merge("null").is_err());
    }
}
