// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::output::OutputMode;
use std::env;

pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254";

const ENV_IMDS_ENDPOINT: &str = "AWS_EC2_METADATA_SERVICE_ENDPOINT";
const ENV_IMDS_DISABLED: &str = "AWS_EC2_METADATA_DISABLED";

/// Settings for the DescribeTags client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsConfig {
    /// Named shared-credentials profile, `None` for the default credential chain
    pub profile: Option<String>,
    pub region: String,
    /// Endpoint URL override, `None` for the regional default
    pub endpoint: Option<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }
}

/// Settings for the instance metadata service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdsConfig {
    /// Base URL, without trailing slash
    pub endpoint: String,
    pub disabled: bool,
}

impl Default for ImdsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            disabled: false,
        }
    }
}

impl ImdsConfig {
    /// Create configuration from the standard AWS IMDS environment variables
    pub fn from_env() -> Self {
        let endpoint = env::var(ENV_IMDS_ENDPOINT)
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_IMDS_ENDPOINT.to_string());
        let disabled = env::var(ENV_IMDS_DISABLED)
            .map(|val| val.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self { endpoint, disabled }
    }
}

/// Everything one run needs. Built once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tags: TagsConfig,
    pub imds: ImdsConfig,
    pub output: OutputMode,
}

impl Config {
    /// Empty `profile`, `endpoint` and `key` mean "not set".
    pub fn new(
        profile: String,
        region: String,
        endpoint: String,
        key: String,
        imds: ImdsConfig,
    ) -> Self {
        Self {
            tags: TagsConfig {
                profile: non_empty(profile),
                region,
                endpoint: non_empty(endpoint),
            },
            imds,
            output: OutputMode::from_key(key),
        }
    }
}

fn non_empty(val: String) -> Option<String> {
    if val.is_empty() {
        None
    } else {
        Some(val)
    }
}
