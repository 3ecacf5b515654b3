// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::tags::TagSet;
use std::io::Write;

/// What gets written to stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the value of this tag key
    SingleKey(String),
    /// The whole tag set as `{"tags":[{"key":..,"value":..}]}`
    Json,
}

impl OutputMode {
    pub fn from_key(key: String) -> Self {
        if key.is_empty() {
            Self::Json
        } else {
            Self::SingleKey(key)
        }
    }
}

/// Value of the last tag with the given key. Later duplicates win.
pub fn single_value<'a>(tags: &'a TagSet, key: &str) -> Option<&'a str> {
    tags.iter()
        .rev()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

pub fn to_json(tags: &TagSet) -> Result<String, Error> {
    serde_json::to_string(tags).map_err(Error::Serialize)
}

/// Renders the tags fully before writing anything, so a failed render leaves `out`
/// untouched. No trailing newline is written in either mode.
pub fn write_tags<W: Write>(out: &mut W, tags: &TagSet, mode: &OutputMode) -> Result<(), Error> {
    let rendered = match mode {
        OutputMode::SingleKey(key) => single_value(tags, key).unwrap_or_default().to_string(),
        OutputMode::Json => to_json(tags)?,
    };
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
