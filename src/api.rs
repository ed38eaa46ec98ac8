//! Dataset loader
//!
//! Fetches the four static JSON files in parallel and joins them into one
//! `Dataset`. The join is all-or-nothing: the first failure aborts the load
//! and no partial dataset is ever returned.
//!
//! The files come either from a local directory (`tokio::fs`) or from an
//! HTTP base URL (`reqwest`).

use std::path::PathBuf;

use pattern_types::{Collections, Company, Dataset, LoadError, Pattern, Problem};
use serde::de::DeserializeOwned;
use url::Url;

pub const PATTERNS_FILE: &str = "patterns.json";
pub const PROBLEMS_FILE: &str = "problems.json";
pub const COMPANIES_FILE: &str = "companies.json";
pub const COLLECTIONS_FILE: &str = "collections.json";

/// Where the static files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Dir(PathBuf),
    /// Base URL, always ending in `/`
    Http(Url),
}

impl DataSource {
    /// `http://` / `https://` locations are URLs, anything else a directory
    pub fn parse(location: &str) -> Result<Self, LoadError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let base = if location.ends_with('/') {
                location.to_string()
            } else {
                format!("{}/", location)
            };
            let url = Url::parse(&base)
                .map_err(|e| LoadError::InvalidSource(location.to_string(), e.to_string()))?;
            Ok(DataSource::Http(url))
        } else {
            Ok(DataSource::Dir(PathBuf::from(location)))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Dir(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Clone)]
pub struct DataClient {
    source: DataSource,
    http: reqwest::Client,
}

impl std::fmt::Debug for DataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl DataClient {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
        }
    }

    /// Client for a directory path or base URL
    pub fn from_location(location: &str) -> Result<Self, LoadError> {
        Ok(Self::new(DataSource::parse(location)?))
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch and parse one file
    pub async fn get<T: DeserializeOwned>(&self, file: &str) -> Result<T, LoadError> {
        let bytes = match &self.source {
            DataSource::Dir(dir) => {
                tokio::fs::read(dir.join(file))
                    .await
                    .map_err(|source| LoadError::Io {
                        file: file.to_string(),
                        source,
                    })?
            }
            DataSource::Http(base) => {
                let url = base
                    .join(file)
                    .map_err(|e| LoadError::InvalidSource(base.to_string(), e.to_string()))?;
                let response = self.http.get(url).send().await.map_err(|e| LoadError::Http {
                    file: file.to_string(),
                    message: e.to_string(),
                })?;

                if !response.status().is_success() {
                    return Err(LoadError::Status {
                        file: file.to_string(),
                        status: response.status().as_u16(),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::Http {
                        file: file.to_string(),
                        message: e.to_string(),
                    })?
                    .to_vec()
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            file: file.to_string(),
            source,
        })
    }

    /// Fetch all four files concurrently; fails if any one fails
    pub async fn load_dataset(&self) -> Result<Dataset, LoadError> {
        tracing::debug!("loading dataset from {}", self.source);

        let (patterns, problems, companies, collections) = tokio::try_join!(
            self.get::<Vec<Pattern>>(PATTERNS_FILE),
            self.get::<Vec<Problem>>(PROBLEMS_FILE),
            self.get::<Vec<Company>>(COMPANIES_FILE),
            self.get::<Collections>(COLLECTIONS_FILE),
        )?;

        tracing::info!(
            patterns = patterns.len(),
            problems = problems.len(),
            companies = companies.len(),
            collections = collections.len(),
            "dataset loaded from {}",
            self.source
        );

        Ok(Dataset {
            patterns,
            problems,
            companies,
            collections,
        })
    }
}
