// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Exit status for a failed DescribeTags call.
pub const EXIT_TAGS: u8 = 1;
/// Exit status when the instance identity could not be resolved.
pub const EXIT_METADATA: u8 = 3;
/// Exit status when the tags could not be written to stdout.
pub const EXIT_OUTPUT: u8 = 4;

/// Errors that can occur while resolving the instance and reading its tags
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Instance metadata service access is disabled")]
    MetadataDisabled,

    #[error("Failed to reach instance metadata service: {0}")]
    MetadataRequest(#[from] reqwest::Error),

    #[error("Instance metadata service returned {status} for {path}")]
    MetadataStatus {
        status: reqwest::StatusCode,
        path: &'static str,
    },

    #[error("Failed to parse instance identity document: {0}")]
    IdentityDocument(#[source] serde_json::Error),

    #[error("Instance identity document has no instanceId")]
    MissingInstanceId,

    #[error("{0}")]
    DescribeTags(String),

    #[error("Failed to serialize tags: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MetadataDisabled
            | Self::MetadataRequest(_)
            | Self::MetadataStatus { .. }
            | Self::IdentityDocument(_)
            | Self::MissingInstanceId => EXIT_METADATA,
            Self::DescribeTags(_) => EXIT_TAGS,
            Self::Serialize(_) | Self::Write(_) => EXIT_OUTPUT,
        }
    }
}
