// Player pool loading from an ordered list of alternate sources.
//
// Each source is tried in turn until one returns a body; the body is then
// validated into a pool. The whole attempt runs under a single timeout.
// Nothing here retries on its own: on failure the caller reports the error
// and the user may ask for a reload.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DataConfig;
use crate::squad::player::{parse_players, PlayerError, PlayerPool};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A single source failing to produce a body.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The pool could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no player data sources configured")]
    NoSources,

    #[error("could not load player data from any source ({})", .attempts.join("; "))]
    AllSourcesFailed { attempts: Vec<String> },

    #[error("loading player data timed out after {}s", .after.as_secs())]
    TimedOut { after: Duration },

    #[error("player data from {source_name} is invalid: {error}")]
    Invalid {
        source_name: String,
        #[source]
        error: PlayerError,
    },
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Somewhere the raw player JSON can be fetched from.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Human-readable location, used in logs and error messages.
    fn describe(&self) -> String;

    /// Fetch the raw JSON body.
    async fn fetch(&self) -> Result<String, SourceError>;
}

/// Fetches the pool over HTTP(S). Any non-success status is a failure.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PlayerSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Reads the pool from a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PlayerSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.path.clone(),
                source: e,
            })
    }
}

/// Build one source per configured entry, preserving order.
pub fn sources_from_config(data: &DataConfig) -> Vec<Box<dyn PlayerSource>> {
    data.sources
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| -> Box<dyn PlayerSource> {
            if s.starts_with("http://") || s.starts_with("https://") {
                Box::new(HttpSource::new(s))
            } else {
                Box::new(FileSource::new(s))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the pool from the first source that answers, within `timeout`.
///
/// A source that answers with malformed data ends the attempt: later
/// alternates are mirrors of the same file and would not fix it.
pub async fn load_players(
    sources: &[Box<dyn PlayerSource>],
    timeout: Duration,
) -> Result<PlayerPool, LoadError> {
    if sources.is_empty() {
        return Err(LoadError::NoSources);
    }

    match tokio::time::timeout(timeout, try_sources(sources)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Player load timed out after {:?}", timeout);
            Err(LoadError::TimedOut { after: timeout })
        }
    }
}

async fn try_sources(sources: &[Box<dyn PlayerSource>]) -> Result<PlayerPool, LoadError> {
    let mut attempts = Vec::with_capacity(sources.len());

    for source in sources {
        let name = source.describe();
        info!("Trying player source {}", name);

        match source.fetch().await {
            Ok(body) => {
                let pool = parse_players(&body).map_err(|error| LoadError::Invalid {
                    source_name: name.clone(),
                    error,
                })?;
                info!("Loaded {} players from {}", pool.len(), name);
                return Ok(pool);
            }
            Err(e) => {
                warn!("Player source {} failed: {}", name, e);
                attempts.push(format!("{name}: {e}"));
            }
        }
    }

    Err(LoadError::AllSourcesFailed { attempts })
}
