// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::TagsConfig;
use crate::error::Error;
use aws_config::{
    profile::ProfileFileCredentialsProvider, retry::RetryConfig, BehaviorVersion, Region,
    SdkConfig,
};
use aws_sdk_ec2::{error::DisplayErrorContext, types::Filter, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const RESOURCE_ID_FILTER: &str = "resource-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tags of one resource, in the order the API returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// Shared SDK configuration: explicit region, optional endpoint override, and either the
/// default credential chain or the named profile. Retries are off, one attempt per call.
pub async fn load_sdk_config(config: &TagsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::disabled());

    if let Some(profile) = &config.profile {
        debug!("Using credentials from shared profile {profile}");
        loader = loader.credentials_provider(
            ProfileFileCredentialsProvider::builder()
                .profile_name(profile)
                .build(),
        );
    }
    if let Some(endpoint) = &config.endpoint {
        debug!("Using EC2 endpoint override {endpoint}");
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

pub async fn build_client(config: &TagsConfig) -> Client {
    let sdk_config = load_sdk_config(config).await;
    Client::new(&sdk_config)
}

/// Issues a single DescribeTags call filtered to `instance_id`. Only the first page is read.
pub async fn fetch_tags(client: &Client, instance_id: &str) -> Result<TagSet, Error> {
    let filter = Filter::builder()
        .name(RESOURCE_ID_FILTER)
        .values(instance_id)
        .build();

    let response = client
        .describe_tags()
        .filters(filter)
        .send()
        .await
        .map_err(|err| Error::DescribeTags(DisplayErrorContext(&err).to_string()))?;

    if response.next_token().is_some_and(|token| !token.is_empty()) {
        warn!(
            "DescribeTags returned more than one page for {instance_id}, only the first page is used"
        );
    }

    let tags: TagSet = response
        .tags()
        .iter()
        .map(|tag| {
            Tag::new(
                tag.key().unwrap_or_default(),
                tag.value().unwrap_or_default(),
            )
        })
        .collect();

    debug!("Fetched {} tags for {instance_id}", tags.len());
    Ok(tags)
}
