use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
enum LoadError {
    #[error("database file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON in database file: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_records(path: &Path) -> Result<BTreeMap<String, Value>, LoadError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Decodes each record on its own; a malformed record is dropped, not the file.
fn decode_records<V: DeserializeOwned>(
    path: &Path,
    raw: BTreeMap<String, Value>,
) -> BTreeMap<String, V> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                warn!("Skipping record {} in {}: {}", key, path.display(), err);
                None
            }
        })
        .collect()
}

/// Read-only key -> record mapping, filled once at startup.
#[derive(Debug, Clone)]
pub struct Store<V> {
    records: BTreeMap<String, V>,
}

impl<V: DeserializeOwned> Store<V> {
    /// Loads `path`, falling back to an empty store if the file is missing
    /// or is not a JSON object.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match read_records(path) {
            Ok(raw) => {
                let records = decode_records(path, raw);
                info!("Loaded {} records from {}", records.len(), path.display());
                Store { records }
            }
            Err(err) => {
                error!("{} ({})", err, path.display());
                Store::from_records(BTreeMap::new())
            }
        }
    }
}

impl<V> Store<V> {
    pub fn from_records(records: BTreeMap<String, V>) -> Self {
        Store { records }
    }

    pub fn all(&self) -> &BTreeMap<String, V> {
        &self.records
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Movie, Showtime};
    use std::io::Write;

    #[test]
    fn loads_fixture_catalog() {
        let movies = fixtures::movies();
        assert_eq!(movies.all().len(), 7);
        let martian = movies.get("a8034f44-aee4-44cf-b32c-74cf452aaaae").unwrap();
        assert_eq!(martian.title.as_deref(), Some("The Martian"));
        assert_eq!(martian.rating, Some(8.2));
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store: Store<Movie> = Store::load(dir.path().join("movies.json"));
        assert!(store.all().is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"20151130\": [\"a\", ").unwrap();
        let store: Store<Showtime> = Store::load(file.path());
        assert!(store.all().is_empty());
    }

    #[test]
    fn mismatched_schema_yields_empty_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();
        let store: Store<Showtime> = Store::load(file.path());
        assert!(store.all().is_empty());
    }

    #[test]
    fn malformed_record_is_dropped_alone() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"m1": {"id": "m1", "title": "T", "rating": 8.0},
                 "m2": {"id": "m2", "rating": "high"},
                 "m3": {"id": "m3"}}"#,
        )
        .unwrap();
        let store: Store<Movie> = Store::load(file.path());
        let keys: Vec<_> = store.all().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["m1", "m3"]);
        assert_eq!(store.get("m3").unwrap().title, None);
    }

    #[test]
    fn keys_are_sorted() {
        let showtimes = fixtures::showtimes();
        let dates: Vec<_> = showtimes.all().keys().cloned().collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert!(showtimes.contains("20151130"));
    }
}
