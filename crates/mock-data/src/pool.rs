//! Mock data pool: the candidate strings the generators pick from.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid mock data JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Mock data collection `{0}` is empty")]
    EmptyCollection(&'static str),
    #[error("Mock data collection `{collection}` has a value with a separator or line break: {value:?}")]
    InvalidValue {
        collection: &'static str,
        value: String,
    },
}

/// Characters that would split a generated TSV line or one of its lists.
const RESERVED_CHARS: [char; 4] = ['\t', '\n', '\r', ';'];

/// Candidate values for generated offers and their hosts.
///
/// Every collection must be non-empty and free of tabs, line breaks and `;`
/// before it is handed to a generator; [`MockServerData::validate`] checks
/// this.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockServerData {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub image_previews: Vec<String>,
    pub photos: Vec<String>,
    pub names: Vec<String>,
    pub emails: Vec<String>,
    pub avatars: Vec<String>,
    pub passwords: Vec<String>,
}

impl MockServerData {
    /// Checks that every collection is non-empty and that no value contains
    /// a field separator, list separator or line break.
    pub fn validate(&self) -> Result<(), PoolError> {
        let collections: [(&'static str, &Vec<String>); 8] = [
            ("titles", &self.titles),
            ("descriptions", &self.descriptions),
            ("imagePreviews", &self.image_previews),
            ("photos", &self.photos),
            ("names", &self.names),
            ("emails", &self.emails),
            ("avatars", &self.avatars),
            ("passwords", &self.passwords),
        ];

        if let Some((name, _)) = collections.iter().find(|(_, values)| values.is_empty()) {
            return Err(PoolError::EmptyCollection(*name));
        }

        for (name, values) in collections {
            if let Some(value) = values.iter().find(|v| v.contains(RESERVED_CHARS)) {
                return Err(PoolError::InvalidValue {
                    collection: name,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let path = path.as_ref();
        debug!("Reading mock data from {}", path.display());
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub async fn fetch(url: &str) -> Result<Self, PoolError> {
        debug!("Fetching mock data from {url}");
        let data = reqwest::get(url)
            .await?
            .error_for_status()?
            .json::<Self>()
            .await?;
        Ok(data)
    }

    /// Loads from an `http(s)://` URL or a local JSON file and validates.
    pub async fn load(source: &str) -> Result<Self, PoolError> {
        let data = if source.starts_with("http://") || source.starts_with("https://") {
            Self::fetch(source).await?
        } else {
            Self::load_file(source).await?
        };

        data.validate()?;
        info!(
            titles = data.titles.len(),
            photos = data.photos.len(),
            names = data.names.len(),
            "Loaded mock data from {source}"
        );
        Ok(data)
    }
}
