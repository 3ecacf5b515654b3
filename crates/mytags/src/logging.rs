// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const ENV_LOG_LEVEL: &str = "MYTAGS_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "warn";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Level from `MYTAGS_LOG_LEVEL`, or `Err` with the rejected value.
fn log_level(raw: Option<String>) -> Result<String, String> {
    match raw.map(|val| val.trim().to_lowercase()) {
        None => Ok(DEFAULT_LOG_LEVEL.to_string()),
        Some(val) if val.is_empty() => Ok(DEFAULT_LOG_LEVEL.to_string()),
        Some(val) if VALID_LOG_LEVELS.contains(&val.as_str()) => Ok(val),
        Some(val) => Err(val),
    }
}

/// Installs a stderr subscriber. Stdout stays reserved for tag output.
pub fn init() {
    let (level, rejected) = match log_level(env::var(ENV_LOG_LEVEL).ok()) {
        Ok(level) => (level, None),
        Err(rejected) => (DEFAULT_LOG_LEVEL.to_string(), Some(rejected)),
    };
    let env_filter = format!("h2=off,hyper=off,rustls=off,{level}");

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
        return;
    }

    if let Some(rejected) = rejected {
        warn!("Invalid {ENV_LOG_LEVEL} '{rejected}', using '{DEFAULT_LOG_LEVEL}'");
    }
    debug!("Logging subsystem enabled");
}
