use std::fmt::{Debug, Formatter};
use std::time::Duration;

use derive_getters::Getters;
use eyre::{ensure, Result};
use serde::{Deserialize, Deserializer};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/genomics/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything needed to talk to the remote read source. Passed explicitly, never read from globals.
#[derive(Clone, PartialEq, Eq, Getters, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL; requests go to `{endpoint}/reads/search`.
    endpoint: String,
    /// Readsets whose reads are counted. Every request carries all of them.
    readset_ids: Vec<String>,
    /// Deadline of a single page request, in seconds when deserialized.
    #[serde(deserialize_with = "seconds")]
    timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when present.
    bearer_token: Option<String>,
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            readset_ids: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            bearer_token: None,
        }
    }
}

impl RemoteConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_readset(mut self, readset_id: impl Into<String>) -> Self {
        self.readset_ids.push(readset_id.into());
        self
    }

    pub fn with_readsets(mut self, readset_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.readset_ids.extend(readset_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Full URL of the search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/reads/search", self.endpoint.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.readset_ids.is_empty(),
            "At least one readset id must be provided"
        );
        ensure!(
            self.readset_ids.iter().all(|x| !x.is_empty()),
            "Readset ids must be non-empty strings"
        );
        ensure!(!self.endpoint.is_empty(), "Remote endpoint must be provided");
        ensure!(!self.timeout.is_zero(), "Remote timeout must be positive");
        Ok(())
    }
}

impl Debug for RemoteConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("endpoint", &self.endpoint)
            .field("readset_ids", &self.readset_ids)
            .field("timeout", &self.timeout)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
