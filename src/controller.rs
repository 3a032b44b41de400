// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Installation of the GitOps controller under test and the condition
//! gates its reconciliation run is measured through.

use crate::cluster::wait;
use crate::cmd::Runner;
use crate::constants::{cluster, controller, timeouts};
use crate::error::Result;
use std::path::Path;
use tracing::info;

const DELIMITER: &str = "==================================================";

/// Install the controller, pointed at the repository mount inside the
/// nodes. `CUE_EXPERIMENT=modules` is required by the controller CLI and
/// set on the child environment only.
pub async fn install(runner: &dyn Runner, repository_dir: &Path) -> Result<()> {
    info!("Installing GitOps controller");
    runner
        .run_with_env(
            Some(repository_dir),
            &format!(
                "declcd install -u {} -b {} --name {} -i {}",
                cluster::REPOSITORY_MOUNT,
                controller::BRANCH,
                controller::PROJECT_NAME,
                controller::INTERVAL_SECS
            ),
            &[("CUE_EXPERIMENT", "modules")],
        )
        .await
}

/// The three sequential gates: controller pod ready, project `Running`,
/// project `Finished`. Each must succeed before the next is attempted.
pub async fn wait_until_finished(runner: &dyn Runner) -> Result<()> {
    wait::pods_ready(
        runner,
        controller::NAMESPACE,
        controller::SHARD_LABEL,
        timeouts::CONTROLLER_READY,
    )
    .await?;
    wait::condition(
        runner,
        controller::NAMESPACE,
        controller::PROJECT_RESOURCE,
        "Running",
        timeouts::PROJECT_RUNNING,
    )
    .await?;
    wait::condition(
        runner,
        controller::NAMESPACE,
        controller::PROJECT_RESOURCE,
        "Finished",
        timeouts::PROJECT_FINISHED,
    )
    .await
}

/// Print the controller's recorded transition timestamps between delimiter
/// lines. Diagnostic evidence only, never parsed.
pub async fn print_transition_times(runner: &dyn Runner) -> Result<()> {
    println!("{DELIMITER}");
    runner
        .run(
            None,
            &format!(
                "kubectl describe {} -n {} | grep \"Last Transition Time\"",
                controller::PROJECT_RESOURCE,
                controller::NAMESPACE
            ),
        )
        .await?;
    println!();
    println!("{DELIMITER}");
    Ok(())
}
