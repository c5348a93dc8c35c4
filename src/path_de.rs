use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages, e.g.
/// `at JSON path [1][0] → invalid type: map, expected ...`.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}
