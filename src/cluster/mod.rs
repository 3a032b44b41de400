// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster lifecycle via the `kind` CLI and condition waits via `kubectl`.

pub mod config;
pub mod wait;

pub use config::ClusterConfig;

use crate::cmd::Runner;
use crate::constants::{cluster, timeouts};
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Create the benchmark cluster from a written cluster-config document,
/// blocking until the control plane is ready or the wait times out.
pub async fn create(runner: &dyn Runner, config_path: &Path) -> Result<()> {
    info!("Creating kind cluster {}", cluster::NAME);
    runner
        .run(
            None,
            &format!(
                "kind create cluster --config {} --name {} --wait {}s",
                config_path.display(),
                cluster::NAME,
                timeouts::CLUSTER_CREATE.as_secs()
            ),
        )
        .await
}

/// Command line tearing the benchmark cluster down, for the cleanup stack.
pub fn delete_command() -> String {
    format!("kind delete cluster --name {}", cluster::NAME)
}
