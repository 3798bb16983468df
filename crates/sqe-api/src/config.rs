// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven configuration.
//!
//! | Variable             | Default | Meaning                                  |
//! |----------------------|---------|------------------------------------------|
//! | `SQE_PORT`           | 8080    | HTTP listen port                         |
//! | `DATABASE_URL`       | unset   | Postgres URL; absent = in-memory mode    |
//! | `SQE_WARMUP_SECS`    | 30      | Delay before the driver's first pass     |
//! | `SQE_DRIVER_ENABLED` | true    | Whether to start the recurring driver    |

use std::time::Duration;

/// Runtime configuration for the API binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub warmup: Duration,
    pub driver_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            warmup: Duration::from_secs(30),
            driver_enabled: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for unset or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parsed("SQE_PORT").unwrap_or(defaults.port),
            warmup: env_parsed("SQE_WARMUP_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.warmup),
            driver_enabled: std::env::var("SQE_DRIVER_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.driver_enabled),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
