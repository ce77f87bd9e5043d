// IPS Console - Main Entry Point
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! IPS Console - terminal control surface for an intrusion-prevention backend.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod actions;
mod api;
mod cli;
mod config;
mod error;
mod form;
mod models;
mod polling;
mod views;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli::run_command(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ips-console: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, more with `-v`/`-vv`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
