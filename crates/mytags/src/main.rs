// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod cli;
mod logging;

use clap::Parser;
use ec2_tags::ImdsConfig;
use std::{env, io, process::ExitCode};
use tracing::debug;

use cli::Args;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let args = Args::parse_from(cli::normalize_args(env::args_os()));

    if args.version {
        println!("{VERSION}");
        return ExitCode::SUCCESS;
    }

    logging::init();

    let config = args.into_config(ImdsConfig::from_env());
    debug!("Starting with {config:?}");

    let mut stdout = io::stdout().lock();
    match ec2_tags::run(&config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("error: {e}");
            debug!("Exiting with status {code}");
            ExitCode::from(code)
        }
    }
}
