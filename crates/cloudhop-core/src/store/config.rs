use serde::{Deserialize, Serialize};
use std::env;

/// Default region when neither `S3_REGION` nor `AWS_REGION` is set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the destination S3 store.
///
/// Static keys are optional: when absent the AWS default credential chain
/// (environment, profile, instance metadata) supplies credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            access_key: env::var("S3_ACCESS_KEY").ok(),
            secret_key: env::var("S3_SECRET_KEY").ok(),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn for_minio(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: Some(DEFAULT_REGION.to_string()),
            access_key: Some("minioadmin".to_string()),
            secret_key: Some("minioadmin".to_string()),
            path_style: true,
        }
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Static key pair, only when both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_for_minio() {
        let config = StorageConfig::for_minio("http://localhost:9000");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(config.path_style);
        assert_eq!(config.static_credentials(), Some(("minioadmin", "minioadmin")));
    }

    #[test]
    fn test_half_configured_keys_fall_back_to_chain() {
        let config = StorageConfig {
            access_key: Some("AKIA".to_string()),
            ..Default::default()
        };
        assert_eq!(config.static_credentials(), None);
        assert_eq!(config.region_or_default(), DEFAULT_REGION);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("S3_ENDPOINT", "http://minio:9000");
        env::set_var("S3_REGION", "eu-west-1");
        env::set_var("S3_PATH_STYLE", "true");

        let config = StorageConfig::from_env();
        assert_eq!(config.endpoint.as_deref(), Some("http://minio:9000"));
        assert_eq!(config.region_or_default(), "eu-west-1");
        assert!(config.path_style);

        env::remove_var("S3_ENDPOINT");
        env::remove_var("S3_REGION");
        env::remove_var("S3_PATH_STYLE");
    }
}
