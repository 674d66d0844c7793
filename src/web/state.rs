use axum::body::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::analysis::PolarityScorer;
use crate::config::AnalysisConfig;
use crate::dataset::{load_csv, ContentKey, Dataset, DatasetCache, SchemaError};

#[derive(Clone)]
pub struct AppState {
    pub tx: broadcast::Sender<DatasetEvent>,
    pub session: Arc<RwLock<Session>>,
    pub scorer: Arc<dyn PolarityScorer>,
    pub analysis: Arc<AnalysisConfig>,
    pub max_upload_bytes: usize,
}

/// Where the dataset on screen came from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Sample,
    Upload { name: String, key: ContentKey },
}

/// What the dashboard is currently showing.
#[derive(Debug, Clone)]
pub enum ActiveDataset {
    /// Nothing loaded yet: no sample bundled and no upload
    Empty,
    Ready {
        source: DataSource,
        dataset: Arc<Dataset>,
    },
    /// Last upload was rejected; nothing is shown until the next one succeeds
    Failed { name: String, error: String },
}

pub struct Session {
    pub cache: DatasetCache,
    pub sample: Option<Arc<Dataset>>,
    pub active: ActiveDataset,
    pub threshold: u32,
}

/// Pushed to SSE subscribers whenever the active dataset changes.
#[derive(Debug, Clone)]
pub struct DatasetEvent {
    pub source: String,
    pub rows: usize,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("upload worker failed: {0}")]
    Worker(#[from] JoinError),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Sample => "bundled sample".to_string(),
            DataSource::Upload { name, key } => format!("{} ({})", name, key.short()),
        }
    }
}

impl AppState {
    pub fn new(
        tx: broadcast::Sender<DatasetEvent>,
        sample: Option<Dataset>,
        scorer: Arc<dyn PolarityScorer>,
        analysis: AnalysisConfig,
        max_upload_bytes: usize,
    ) -> Self {
        let sample = sample.map(Arc::new);
        let active = match &sample {
            Some(dataset) => ActiveDataset::Ready {
                source: DataSource::Sample,
                dataset: dataset.clone(),
            },
            None => ActiveDataset::Empty,
        };
        let threshold = analysis.clamp_threshold(analysis.spike_threshold);

        Self {
            tx,
            session: Arc::new(RwLock::new(Session {
                cache: DatasetCache::new(),
                sample,
                active,
                threshold,
            })),
            scorer,
            analysis: Arc::new(analysis),
            max_upload_bytes,
        }
    }

    pub async fn active(&self) -> ActiveDataset {
        self.session.read().await.active.clone()
    }

    pub async fn threshold(&self) -> u32 {
        self.session.read().await.threshold
    }

    /// Remember a new threshold for the session, clamped to the configured
    /// range. `None` keeps the current one.
    pub async fn set_threshold(&self, requested: Option<u32>) -> u32 {
        let mut session = self.session.write().await;
        if let Some(requested) = requested {
            session.threshold = self.analysis.clamp_threshold(requested);
        }
        session.threshold
    }

    pub async fn upload(&self, name: String, bytes: Bytes) -> Result<usize, UploadError> {
        let (key, bytes) =
            tokio::task::spawn_blocking(move || (ContentKey::of(&bytes), bytes)).await?;

        let cached = self.session.write().await.cache.lookup(&key);
        let loaded = match cached {
            Some(dataset) => Ok(dataset),
            None => tokio::task::spawn_blocking(move || load_csv(&bytes).map(Arc::new)).await?,
        };

        let result = {
            let mut session = self.session.write().await;
            let (hits, misses) = session.cache.stats();
            debug!("Dataset cache stats - hits={}, misses={}", hits, misses);
            match loaded {
                Ok(dataset) => {
                    let rows = dataset.len();
                    session.cache.store(key.clone(), dataset.clone());
                    session.active = ActiveDataset::Ready {
                        source: DataSource::Upload {
                            name: name.clone(),
                            key,
                        },
                        dataset,
                    };
                    Ok(rows)
                }
                Err(e) => {
                    session.cache.invalidate();
                    session.active = ActiveDataset::Failed {
                        name: name.clone(),
                        error: e.to_string(),
                    };
                    Err(e)
                }
            }
        };

        let event = match &result {
            Ok(rows) => {
                info!("Dataset uploaded - name={}, rows={}", name, rows);
                DatasetEvent {
                    source: name,
                    rows: *rows,
                    ok: true,
                    message: format!("Loaded {} rows", rows),
                }
            }
            Err(e) => {
                warn!("Upload rejected - name={}, error={}", name, e);
                DatasetEvent {
                    source: name,
                    rows: 0,
                    ok: false,
                    message: e.to_string(),
                }
            }
        };
        self.notify(event);

        result.map_err(UploadError::from)
    }

    /// Drop the uploaded dataset and go back to the bundled sample.
    pub async fn reset(&self) {
        let event = {
            let mut session = self.session.write().await;
            session.cache.invalidate();
            let sample = session.sample.clone();
            let rows = sample.as_ref().map_or(0, |d| d.len());
            let ok = sample.is_some();
            session.active = match sample {
                Some(dataset) => ActiveDataset::Ready {
                    source: DataSource::Sample,
                    dataset,
                },
                None => ActiveDataset::Empty,
            };
            DatasetEvent {
                source: DataSource::Sample.describe(),
                rows,
                ok,
                message: "Reset to bundled sample".to_string(),
            }
        };
        info!("Session reset - rows={}", event.rows);
        self.notify(event);
    }

    fn notify(&self, event: DatasetEvent) {
        if self.tx.send(event).is_err() {
            debug!("No active SSE subscribers for dataset event");
        }
    }
}
