use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Attributes not covered by the schema, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A movie as returned by `GET /movies/<id>`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub uri: String,
}

impl Movie {
    /// Unrated movies count as 0.
    pub fn rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

impl MovieDetail {
    /// `movie_id` is the catalog key the movie was looked up by.
    pub fn new(movie_id: &str, movie: Movie) -> Self {
        MovieDetail {
            movie,
            uri: format!("/movies/{}", movie_id),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Movie ids screened on a date, in screening order.
pub type Showtime = Vec<String>;

/// Date -> movie ids booked by one user on that date.
pub type Booking = BTreeMap<String, Vec<String>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookedMovie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rating: f64,
    pub uri: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Suggestions {
    pub suggested_movies: Vec<Movie>,
}

/// Root document of a service listing its sub-resource URI templates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Discovery {
    pub uri: String,
    pub subresource_uris: BTreeMap<String, String>,
}

impl Discovery {
    pub fn new(resources: &[(&str, &str)]) -> Self {
        Discovery {
            uri: "/".to_owned(),
            subresource_uris: resources
                .iter()
                .map(|(name, template)| (name.to_string(), template.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movie_keeps_unknown_attributes() {
        let value = json!({
            "id": "m1",
            "title": "Arrival",
            "rating": 7.9,
            "director": "Denis Villeneuve",
            "runtime": 116
        });
        let movie: Movie = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(movie.extra.get("runtime"), Some(&json!(116)));
        assert_eq!(serde_json::to_value(&movie).unwrap(), value);
    }

    #[test]
    fn missing_rating_defaults_to_zero() {
        let movie: Movie = serde_json::from_value(json!({"id": "m1", "title": "Untitled"})).unwrap();
        assert_eq!(movie.rating(), 0.0);
    }

    #[test]
    fn absent_attributes_stay_absent() {
        let value = json!({"id": "m1", "title": "T", "rating": 8.0});
        let movie: Movie = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&movie).unwrap(), value);

        let bare: Movie = serde_json::from_value(json!({"director": "Anonymous"})).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"director": "Anonymous"}));
    }

    #[test]
    fn detail_injects_uri() {
        let movie: Movie = serde_json::from_value(json!({
            "id": "m1",
            "title": "Arrival",
            "rating": 7.9,
            "director": "Denis Villeneuve"
        }))
        .unwrap();
        let detail = serde_json::to_value(MovieDetail::new("k1", movie)).unwrap();
        assert_eq!(detail["uri"], "/movies/k1");
        assert_eq!(detail["id"], "m1");
        assert_eq!(detail["title"], "Arrival");
    }

    #[test]
    fn booked_movie_ignores_other_detail_fields() {
        let booked: BookedMovie = serde_json::from_value(json!({
            "id": "m1",
            "title": "Arrival",
            "rating": 7.9,
            "director": "Denis Villeneuve",
            "uri": "/movies/m1"
        }))
        .unwrap();
        assert_eq!(booked.uri, "/movies/m1");
    }
}
