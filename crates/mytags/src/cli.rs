// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use clap::{ArgAction, Parser};
use ec2_tags::config::DEFAULT_REGION;
use ec2_tags::{Config, ImdsConfig};
use std::ffi::OsString;

/// Long flags that take a separate value argument.
const VALUE_FLAGS: [&str; 4] = ["profile", "region", "endpoint", "key"];
const SWITCH_FLAGS: [&str; 2] = ["version", "help"];

#[derive(Parser, Debug)]
#[command(
    name = "mytags",
    about = "Print the tags of the EC2 instance this command runs on"
)]
pub struct Args {
    /// Shared credentials profile, the default credential chain is used when empty
    #[arg(long, default_value_t, allow_hyphen_values = true)]
    pub profile: String,

    /// AWS region of the EC2 API
    #[arg(long, default_value = DEFAULT_REGION, allow_hyphen_values = true)]
    pub region: String,

    /// EC2 API endpoint URL, the regional endpoint is used when empty
    #[arg(long, default_value_t, allow_hyphen_values = true)]
    pub endpoint: String,

    /// Print only the value of this tag key
    #[arg(long, default_value_t, allow_hyphen_values = true)]
    pub key: String,

    /// Print the version and exit
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub version: bool,
}

impl Args {
    pub fn into_config(self, imds: ImdsConfig) -> Config {
        Config::new(self.profile, self.region, self.endpoint, self.key, imds)
    }
}

/// Rewrites single-dash long flags (`-key Env`, `-region=us-east-1`) to the double-dash
/// form. The program name, values of value flags and everything after `--` are kept.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expects_value = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let Some(flag) = arg.to_str().and_then(long_flag) else {
            normalized.push(arg);
            continue;
        };
        expects_value = !flag.has_inline_value && VALUE_FLAGS.contains(&flag.name);
        if flag.single_dash {
            let mut rewritten = OsString::from("-");
            rewritten.push(&arg);
            normalized.push(rewritten);
        } else {
            normalized.push(arg);
        }
    }

    normalized
}

struct LongFlag<'a> {
    name: &'a str,
    single_dash: bool,
    has_inline_value: bool,
}

fn long_flag(arg: &str) -> Option<LongFlag<'_>> {
    let (body, single_dash) = match arg.strip_prefix("--") {
        Some(body) => (body, false),
        None => (arg.strip_prefix('-')?, true),
    };
    let (name, has_inline_value) = match body.split_once('=') {
        Some((name, _)) => (name, true),
        None => (body, false),
    };
    if VALUE_FLAGS.contains(&name) || SWITCH_FLAGS.contains(&name) {
        Some(LongFlag {
            name,
            single_dash,
            has_inline_value,
        })
    } else {
        None
    }
}
