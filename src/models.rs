use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{entities::movie, error::ApiError};

/// Columns the store alone controls; stripped from every inbound field map.
pub const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

pub const MAX_TITLE_LEN: usize = 100;

pub fn strip_fields(mut fields: Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    for key in reserved {
        fields.remove(*key);
    }
    fields
}

pub fn strip_reserved(fields: Map<String, Value>) -> Map<String, Value> {
    strip_fields(fields, RESERVED_FIELDS)
}

/// The writable subset of a movie record, as accepted from clients and from
/// the OMDb mapping. Fields absent here stay under server control.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MovieInput {
    pub title: String,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub genre: Option<String>,
    pub actors: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub imdb_rating: Option<f64>,
}

impl MovieInput {
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, ApiError> {
        let fields = strip_reserved(fields);
        let input: MovieInput = serde_json::from_value(Value::Object(fields))
            .map_err(|err| ApiError::validation(format!("invalid movie fields: {err}")))?;
        input.validate()?;
        Ok(input)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("title must not be empty"));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiError::validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub data: Vec<movie::Model>,
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn strip_reserved_removes_server_managed_keys() {
        let stripped = strip_reserved(fields(json!({
            "id": 42,
            "title": "Heat",
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-01-01T00:00:00Z",
            "year": 1995,
        })));

        assert_eq!(stripped.len(), 2);
        assert_eq!(stripped["title"], json!("Heat"));
        assert_eq!(stripped["year"], json!(1995));
    }

    #[test]
    fn strip_reserved_is_identity_when_keys_absent() {
        let input = fields(json!({"title": "Heat", "director": "Michael Mann"}));
        assert_eq!(strip_reserved(input.clone()), input);
    }

    #[test]
    fn strip_reserved_passes_unknown_keys_through() {
        let stripped = strip_reserved(fields(json!({"title": "Heat", "poster_url": "x"})));
        assert!(stripped.contains_key("poster_url"));
    }

    #[test]
    fn strip_fields_honors_custom_reserved_set() {
        let stripped =
            strip_fields(fields(json!({"a": 1, "b": 2, "c": 3})), &["b", "missing"]);
        assert_eq!(stripped, fields(json!({"a": 1, "c": 3})));
    }

    #[test]
    fn from_fields_accepts_a_full_record() {
        let input = MovieInput::from_fields(fields(json!({
            "title": "The Celebration",
            "plot": "A family gathering goes wrong.",
            "language": "Danish",
            "country": "Denmark",
            "director": "Thomas Vinterberg",
            "writer": "Thomas Vinterberg, Mogens Rukov",
            "genre": "Drama",
            "actors": "Ulrich Thomsen",
            "year": 1998,
            "runtime": 105,
            "imdb_rating": 8.1,
        })))
        .expect("valid input");

        assert_eq!(input.title, "The Celebration");
        assert_eq!(input.year, Some(1998));
        assert_eq!(input.runtime, Some(105));
        assert_eq!(input.imdb_rating, Some(8.1));
    }

    #[test]
    fn from_fields_defaults_absent_optionals_to_none() {
        let input = MovieInput::from_fields(fields(json!({"title": "Barbie"}))).expect("valid");
        assert_eq!(input.plot, None);
        assert_eq!(input.year, None);
        assert_eq!(input.imdb_rating, None);
    }

    #[test]
    fn from_fields_discards_reserved_keys_instead_of_rejecting() {
        let input = MovieInput::from_fields(fields(json!({
            "id": 999,
            "title": "Barbie",
            "created_at": "not even a timestamp",
        })))
        .expect("reserved keys are stripped, not validated");
        assert_eq!(input.title, "Barbie");
    }

    #[test]
    fn from_fields_rejects_missing_title() {
        assert!(MovieInput::from_fields(fields(json!({"year": 1998}))).is_err());
    }

    #[test]
    fn from_fields_rejects_blank_title() {
        assert!(MovieInput::from_fields(fields(json!({"title": ""}))).is_err());
        assert!(MovieInput::from_fields(fields(json!({"title": "   "}))).is_err());
    }

    #[test]
    fn from_fields_rejects_overlong_title() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(MovieInput::from_fields(fields(json!({"title": long}))).is_err());

        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(MovieInput::from_fields(fields(json!({"title": exact}))).is_ok());
    }

    #[test]
    fn from_fields_rejects_wrong_types() {
        assert!(MovieInput::from_fields(fields(json!({"title": 7}))).is_err());
        assert!(MovieInput::from_fields(fields(json!({"title": "X", "year": "1998"}))).is_err());
    }
}
