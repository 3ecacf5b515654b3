// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod error;
pub mod imds;
pub mod output;
pub mod tags;

pub use config::{Config, ImdsConfig, TagsConfig};
pub use error::Error;
pub use output::OutputMode;
pub use tags::{Tag, TagSet};

use std::io::Write;
use tracing::debug;

/// Resolves the running instance, reads its tags and writes them to `out`.
///
/// The EC2 client is built before the metadata service is contacted. Each step runs once
/// and the first failure ends the run.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> Result<(), Error> {
    let client = tags::build_client(&config.tags).await;
    let instance_id = imds::resolve_instance_identity(&config.imds).await?;
    let tags = tags::fetch_tags(&client, &instance_id).await?;
    debug!("Writing {} tags as {:?}", tags.len(), config.output);
    output::write_tags(out, &tags, &config.output)
}
