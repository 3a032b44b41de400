// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fake Helm applications exercising the controller's chart paths.

use crate::cmd::Runner;
use crate::error::Result;
use crate::manifests;
use std::path::Path;
use tracing::info;

/// Chart version `helm create` scaffolds, baked into the archive name
const CHART_VERSION: &str = "0.1.0";

/// Create, package and upload one disposable chart, and render the
/// manifest the controller will reconcile it from. `repo_url` is the chart
/// repository as resolved in-cluster; `push_url` is where the packaged
/// archive goes from the host (`oci://` via `helm push`, HTTP via raw
/// upload).
pub async fn install_helm_app(
    runner: &dyn Runner,
    charts_dir: &Path,
    infrastructure_dir: &Path,
    index: usize,
    repo_url: &str,
    push_url: &str,
) -> Result<()> {
    let chart_name = format!("fakeapp{index}");
    info!("Packaging fake chart {} for {}", chart_name, push_url);

    runner
        .run(Some(charts_dir), &format!("helm create {chart_name}"))
        .await?;
    runner
        .run(Some(charts_dir), &format!("helm package ./{chart_name}"))
        .await?;

    manifests::write_helm_app(infrastructure_dir, index, &chart_name, repo_url)?;

    let archive = format!("{chart_name}-{CHART_VERSION}.tgz");
    if push_url.starts_with("http") {
        runner
            .run(
                Some(charts_dir),
                &format!("curl --data-binary \"@{archive}\" {push_url}"),
            )
            .await
    } else {
        runner
            .run(Some(charts_dir), &format!("helm push {archive} {push_url}"))
            .await
    }
}
