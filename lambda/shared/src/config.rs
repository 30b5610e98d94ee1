//! Process-wide settings, resolved once when a function starts.

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::error::ConfigError;
use crate::observability::MetricsConfig;

pub const TABLE_VAR: &str = "SAMPLE_TABLE";
pub const REGION_VAR: &str = "REGION";
pub const SERVICE_NAME_VAR: &str = "POWERTOOLS_SERVICE_NAME";
pub const METRICS_NAMESPACE_VAR: &str = "POWERTOOLS_METRICS_NAMESPACE";

pub const DEFAULT_SERVICE_NAME: &str = "serverless-rust-demo";
pub const DEFAULT_METRICS_NAMESPACE: &str = "serverless-rust-demo";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table_name: String,
    /// `None` leaves region resolution to the SDK default provider chain.
    pub region: Option<String>,
    pub service_name: String,
    pub metrics_namespace: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let table_name = read(TABLE_VAR).ok_or(ConfigError::Missing(TABLE_VAR))?;

        Ok(Self {
            table_name,
            region: read(REGION_VAR),
            service_name: read(SERVICE_NAME_VAR)
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            metrics_namespace: read(METRICS_NAMESPACE_VAR)
                .unwrap_or_else(|| DEFAULT_METRICS_NAMESPACE.to_string()),
        })
    }

    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        loader.load().await
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            namespace: self.metrics_namespace.clone(),
            service: self.service_name.clone(),
        }
    }
}
