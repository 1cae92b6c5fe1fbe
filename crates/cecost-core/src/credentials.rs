//! Service credentials and where they come from
//!
//! Credentials are collected as [`RawCredentials`] (every field optional)
//! from a JSON configuration file and from explicit values such as CLI
//! flags or environment variables. The layers are merged and then validated
//! into [`ServiceCredentials`], which always holds all four required fields.
//!
//! The configuration file keeps the credentials under `AWS.CostExplorer`:
//!
//! ```json
//! {
//!   "AWS": {
//!     "CostExplorer": {
//!       "apiVersion": "2017-10-25",
//!       "accessKeyId": "AKIA...",
//!       "secretAccessKey": "...",
//!       "region": "us-east-1"
//!     }
//!   }
//! }
//! ```

use crate::error::{CecostError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default location of the configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/default.json";

/// Unvalidated credential fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCredentials {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl RawCredentials {
    /// Read the `AWS.CostExplorer` section of a JSON configuration file
    ///
    /// A file without that section yields empty credentials, which will
    /// later fail validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&contents)?;

        let Some(section) = document.get("AWS") else {
            warn!("Config key AWS not found in {}", path.display());
            return Ok(Self::default());
        };
        let Some(section) = section.get("CostExplorer") else {
            warn!("Config key AWS.CostExplorer not found in {}", path.display());
            return Ok(Self::default());
        };

        debug!("Loaded AWS.CostExplorer credentials from {}", path.display());
        Ok(serde_json::from_value(section.clone())?)
    }

    /// Load from `path` if given, else from [`DEFAULT_CONFIG_PATH`] when it exists
    ///
    /// An explicitly named file that cannot be read is an error; a missing
    /// default file is not.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No configuration file at {}", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: RawCredentials) -> Self {
        Self {
            api_version: other.api_version.or(self.api_version),
            access_key_id: other.access_key_id.or(self.access_key_id),
            secret_access_key: other.secret_access_key.or(self.secret_access_key),
            region: other.region.or(self.region),
        }
    }

    /// Check that all four fields are present and non-empty
    pub fn validate(self) -> Result<ServiceCredentials> {
        fn require(value: Option<String>, key: &str) -> Result<String> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(CecostError::Configuration(format!(
                    "AWS config object validation error, need {key} key"
                ))),
            }
        }

        Ok(ServiceCredentials {
            api_version: require(self.api_version, "apiVersion")?,
            access_key_id: require(self.access_key_id, "accessKeyId")?,
            secret_access_key: require(self.secret_access_key, "secretAccessKey")?,
            region: require(self.region, "region")?,
        })
    }
}

/// Validated, immutable credentials for the billing service
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    api_version: String,
    access_key_id: String,
    secret_access_key: String,
    region: String,
}

impl ServiceCredentials {
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("api_version", &self.api_version)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

impl TryFrom<RawCredentials> for ServiceCredentials {
    type Error = CecostError;

    fn try_from(raw: RawCredentials) -> Result<Self> {
        raw.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn complete() -> RawCredentials {
        RawCredentials {
            api_version: Some("2017-10-25".to_string()),
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            region: Some("us-east-1".to_string()),
        }
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_complete() {
        let credentials = complete().validate().unwrap();
        assert_eq!(credentials.api_version(), "2017-10-25");
        assert_eq!(credentials.region(), "us-east-1");
    }

    #[test]
    fn test_validate_reports_first_missing_key() {
        let raw = RawCredentials {
            api_version: None,
            region: None,
            ..complete()
        };
        let error = raw.validate().unwrap_err();
        assert!(error.is_configuration());
        assert!(error.to_string().contains("need apiVersion key"));

        let raw = RawCredentials {
            region: None,
            ..complete()
        };
        assert!(raw.validate().unwrap_err().to_string().contains("need region key"));
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let raw = RawCredentials {
            secret_access_key: Some("  ".to_string()),
            ..complete()
        };
        let error = raw.validate().unwrap_err();
        assert!(error.to_string().contains("need secretAccessKey key"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = complete().validate().unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"secret\""));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = complete();
        let overlay = RawCredentials {
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.region.as_deref(), Some("eu-west-1"));
        assert_eq!(merged.access_key_id.as_deref(), Some("AKIAEXAMPLE"));
    }

    #[test]
    fn test_from_file_reads_cost_explorer_section() {
        let file = write_config(
            r#"{"AWS": {"CostExplorer": {
                "apiVersion": "2017-10-25",
                "accessKeyId": "AKIAFILE",
                "secretAccessKey": "filesecret",
                "region": "ap-northeast-1"
            }}}"#,
        );
        let raw = RawCredentials::from_file(file.path()).unwrap();
        assert_eq!(raw.access_key_id.as_deref(), Some("AKIAFILE"));
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_from_file_without_section_is_empty() {
        let file = write_config(r#"{"AWS": {"S3": {}}}"#);
        let raw = RawCredentials::from_file(file.path()).unwrap();
        assert_eq!(raw, RawCredentials::default());

        let file = write_config(r#"{"database": "postgres"}"#);
        let raw = RawCredentials::from_file(file.path()).unwrap();
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_from_file_invalid_json() {
        let file = write_config("not json");
        let result = RawCredentials::from_file(file.path());
        assert!(matches!(result, Err(CecostError::Json(_))));
    }

    #[test]
    fn test_discover_explicit_missing_file_is_error() {
        let result = RawCredentials::discover(Some(Path::new("/nonexistent/cecost.json")));
        assert!(matches!(result, Err(CecostError::Io(_))));
    }
}
