// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use declcd_benchmark::cmd::ShellRunner;
use declcd_benchmark::config::{Config, Opts};
use declcd_benchmark::driver::Driver;
use declcd_benchmark::registry;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();

    // Failures land on stdout; the exit status carries no meaning
    if let Err(err) = run(&opts).await {
        println!("{err:#}");
    }

    println!("Finished");
}

async fn run(opts: &Opts) -> Result<()> {
    let config = Config::from_opts(opts)?;
    info!(
        "Starting benchmark: {} apps, {} OCI Helm apps, {} HTTP Helm apps",
        config.app_count, config.oci_helm_app_count, config.yaml_helm_app_count
    );

    let registry = registry::select(config.registry);
    let driver = Driver::new(config, Arc::new(ShellRunner), registry);
    driver.run().await
}
