//! Run configuration and simulation parameters.

use crate::components::GardenConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wall-clock budget for a run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Limits applied by the run driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Stop the run once this much time has passed. The check happens
    /// between events, so a single long handler can overshoot it.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Options handed to components when they are instantiated.
///
/// ```rust
/// use hsm_sim::config::SimParameters;
///
/// let params: SimParameters = serde_json::from_str(r#"{"message": "ПРИВЕТ"}"#).unwrap();
/// assert_eq!(params.message.as_deref(), Some("ПРИВЕТ"));
/// assert!(params.garden.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimParameters {
    /// Text consumed by `Reader` components.
    #[serde(default)]
    pub message: Option<String>,
    /// Field shared by the gardener components.
    #[serde(default, alias = "gardener")]
    pub garden: Option<GardenConfig>,
}

impl SimParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_garden(mut self, garden: GardenConfig) -> Self {
        self.garden = Some(garden);
        self
    }
}
