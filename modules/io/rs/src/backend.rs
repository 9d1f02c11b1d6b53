use eyre::Result;
use readcov_core_rs::source::{ApiError, Cursor, Page, ReadSource, SourceLocus};
use serde::Deserialize;

use crate::mock::MockReadSource;
use crate::remote::{RemoteConfig, RemoteReadSource};

/// The closed set of read sources, selected explicitly by the caller.
#[derive(Clone, Debug)]
pub enum Backend {
    Remote(RemoteReadSource),
    Mock(MockReadSource),
}

/// Serializable backend selection, e.g. `{"kind": "remote", "readset_ids": ["..."]}` or `{"kind": "mock"}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Remote(RemoteConfig),
    Mock,
}

impl Backend {
    pub fn from_config(config: BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Remote(config) => Ok(Backend::Remote(RemoteReadSource::new(config)?)),
            BackendConfig::Mock => Ok(Backend::Mock(MockReadSource::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Remote(_) => "remote",
            Backend::Mock(_) => "mock",
        }
    }
}

impl From<MockReadSource> for Backend {
    fn from(source: MockReadSource) -> Self {
        Backend::Mock(source)
    }
}

impl From<RemoteReadSource> for Backend {
    fn from(source: RemoteReadSource) -> Self {
        Backend::Remote(source)
    }
}

impl ReadSource for Backend {
    fn fetch_page(&mut self, locus: &SourceLocus, cursor: Option<&Cursor>) -> Result<Page, ApiError> {
        match self {
            Backend::Remote(source) => source.fetch_page(locus, cursor),
            Backend::Mock(source) => source.fetch_page(locus, cursor),
        }
    }
}
