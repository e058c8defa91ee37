use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::Result;

pub const STUDENT_REGISTRATION_PATH: &str = "/register/student";
pub const PARENT_REGISTRATION_PATH: &str = "/register/parent";
pub const STUDENT_ID_RESERVATION_PATH: &str = "/generate/student_id";
pub const HEALTH_PATH: &str = "/healthz";

pub trait Configuration {
    /// Scheme and authority of the registration server, e.g. `http://localhost:5000`.
    fn base_url(&self) -> &str;

    fn student_endpoint(&self) -> &str;

    fn parent_endpoint(&self) -> &str;

    /// Joins `path` onto the base url without doubling the slash.
    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Endpoint layout of a registration server.
///
/// Every field has a default, so a JSON document only needs to name what
/// differs from a stock deployment:
///
/// ```ignore
/// let config = ClientConfig::from_json(r#"{"base_url": "https://school.example"}"#)?;
/// assert_eq!(config.student_endpoint(), "/register/student");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub student_path: String,
    pub parent_path: String,
    pub reservation_path: String,
    pub health_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            student_path: STUDENT_REGISTRATION_PATH.to_string(),
            parent_path: PARENT_REGISTRATION_PATH.to_string(),
            reservation_path: STUDENT_ID_RESERVATION_PATH.to_string(),
            health_path: HEALTH_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

impl Configuration for ClientConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn student_endpoint(&self) -> &str {
        &self.student_path
    }

    fn parent_endpoint(&self) -> &str {
        &self.parent_path
    }
}
