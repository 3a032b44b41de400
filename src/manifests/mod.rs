// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Materializes the generated GitOps repository tree from templates.

pub mod templates;

use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tera::Context;
use tracing::info;

/// Namespace every generated application is placed in
pub const NAMESPACE: &str = "alpha";

/// Remove any existing tree at `path` and recreate it empty, so every run
/// starts from the same state regardless of leftovers from a prior run.
pub fn ensure_clean_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Name of the i-th plain application
pub fn app_name(index: usize) -> String {
    format!("app{index}")
}

/// Name of the i-th Helm application
pub fn helm_app_name(index: usize) -> String {
    format!("helmapp{index}")
}

/// Rebuild `apps/` and `infrastructure/` and render the namespace file plus
/// one manifest per plain application. `image` is the workload image
/// reference the generated deployments pull.
pub fn generate(config: &Config, image: &str) -> Result<()> {
    let apps_dir = config.apps_dir();
    let infrastructure_dir = config.infrastructure_dir();

    ensure_clean_dir(&apps_dir)?;
    ensure_clean_dir(&infrastructure_dir)?;
    let git_dir = config.repository_dir().join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(&git_dir)?;
    }

    write_namespace(&apps_dir)?;
    for index in 0..config.app_count {
        write_app(&apps_dir, index, image)?;
    }

    info!(
        "Generated {} application manifests under {}",
        config.app_count,
        apps_dir.display()
    );
    Ok(())
}

/// Render `apps/alpha.cue` declaring the shared namespace.
pub fn write_namespace(apps_dir: &Path) -> Result<()> {
    let mut context = Context::new();
    context.insert("package", "apps");
    context.insert("namespace", NAMESPACE);
    let rendered = templates::render(templates::NAMESPACE, &context)?;
    fs::write(apps_dir.join(format!("{NAMESPACE}.cue")), rendered)?;
    Ok(())
}

/// Render `apps/app<i>/app<i>.cue`.
pub fn write_app(apps_dir: &Path, index: usize, image: &str) -> Result<()> {
    let name = app_name(index);
    let app_dir = apps_dir.join(&name);
    fs::create_dir_all(&app_dir)?;

    let mut context = Context::new();
    context.insert("package", &name);
    context.insert("app", &name);
    context.insert("namespace", NAMESPACE);
    context.insert("image", image);
    let rendered = templates::render(templates::APP, &context)?;
    fs::write(app_dir.join(format!("{name}.cue")), rendered)?;
    Ok(())
}

/// Render `infrastructure/helmapp<i>/helmapp<i>.cue` pointing at a packaged
/// fake chart in the given repository.
pub fn write_helm_app(
    infrastructure_dir: &Path,
    index: usize,
    chart_name: &str,
    repo_url: &str,
) -> Result<()> {
    let name = helm_app_name(index);
    let helm_app_dir = infrastructure_dir.join(&name);
    fs::create_dir_all(&helm_app_dir)?;

    let mut context = Context::new();
    context.insert("package", &name);
    context.insert("helm_app", &name);
    context.insert("namespace", NAMESPACE);
    context.insert("chart_name", chart_name);
    context.insert("repo_url", repo_url);
    let rendered = templates::render(templates::HELM_APP, &context)?;
    fs::write(helm_app_dir.join(format!("{name}.cue")), rendered)?;
    Ok(())
}
