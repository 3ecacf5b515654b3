// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Instance identity lookup through the EC2 instance metadata service.
//!
//! An IMDSv2 session token is requested first. A 403 on the token request means the
//! service is disabled for this instance; any other token failure falls back to an
//! unauthenticated IMDSv1 request for the identity document.

use crate::config::ImdsConfig;
use crate::error::Error;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const TOKEN_PATH: &str = "/latest/api/token";
pub const IDENTITY_DOCUMENT_PATH: &str = "/latest/dynamic/instance-identity/document";

const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
const TOKEN_TTL_SECS: u32 = 21600;
const IMDS_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceIdentityDocument {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub region: String,
    pub account_id: Option<String>,
    pub availability_zone: Option<String>,
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub private_ip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImdsClient {
    endpoint: String,
    http: Client,
}

impl ImdsClient {
    pub fn new(config: &ImdsConfig) -> Result<Self, Error> {
        if config.disabled {
            return Err(Error::MetadataDisabled);
        }
        let http = Client::builder().timeout(IMDS_TIMEOUT).build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    /// `Ok(None)` means IMDSv2 is unavailable and the caller should go on without a token.
    async fn session_token(&self) -> Result<Option<String>, Error> {
        let response = match self
            .http
            .put(format!("{}{TOKEN_PATH}", self.endpoint))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECS)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("IMDSv2 token request failed, falling back to IMDSv1: {err}");
                return Ok(None);
            }
        };

        match response.status() {
            StatusCode::FORBIDDEN => Err(Error::MetadataDisabled),
            status if status.is_success() => match response.text().await {
                Ok(token) => Ok(Some(token)),
                Err(err) => {
                    debug!("Unable to read IMDSv2 token, falling back to IMDSv1: {err}");
                    Ok(None)
                }
            },
            status => {
                debug!("IMDSv2 token request returned {status}, falling back to IMDSv1");
                Ok(None)
            }
        }
    }

    pub async fn identity_document(&self) -> Result<InstanceIdentityDocument, Error> {
        let token = self.session_token().await?;

        let mut request = self
            .http
            .get(format!("{}{IDENTITY_DOCUMENT_PATH}", self.endpoint));
        if let Some(token) = &token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::MetadataStatus {
                status,
                path: IDENTITY_DOCUMENT_PATH,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(Error::IdentityDocument)
    }
}

/// Returns the id of the instance this process runs on.
pub async fn resolve_instance_identity(config: &ImdsConfig) -> Result<String, Error> {
    let document = ImdsClient::new(config)?.identity_document().await?;
    if document.instance_id.is_empty() {
        return Err(Error::MissingInstanceId);
    }
    debug!(
        "Resolved instance {} in {}",
        document.instance_id, document.region
    );
    Ok(document.instance_id)
}
