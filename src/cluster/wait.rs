// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Blocking condition waits against `kubectl wait`.

use crate::cmd::Runner;
use crate::error::Result;
use std::time::Duration;
use tracing::info;

fn namespace_flag(namespace: Option<&str>) -> String {
    namespace.map(|ns| format!(" -n {ns}")).unwrap_or_default()
}

/// Wait until a deployment reports `Available` or the timeout elapses.
pub async fn deployment_available(
    runner: &dyn Runner,
    namespace: Option<&str>,
    name: &str,
    timeout: Duration,
) -> Result<()> {
    info!("Waiting up to {:?} for deployment {} to become available", timeout, name);
    runner
        .run(
            None,
            &format!(
                "kubectl wait{} --for=condition=Available deploy/{} --timeout={}s",
                namespace_flag(namespace),
                name,
                timeout.as_secs()
            ),
        )
        .await
}

/// Wait until pods matching a label selector report `Ready`.
pub async fn pods_ready(
    runner: &dyn Runner,
    namespace: &str,
    selector: &str,
    timeout: Duration,
) -> Result<()> {
    info!("Waiting up to {:?} for pods with label {} to become ready", timeout, selector);
    runner
        .run(
            None,
            &format!(
                "kubectl wait -n {namespace} --for=condition=Ready pod -l {selector} --timeout={}s",
                timeout.as_secs()
            ),
        )
        .await
}

/// Wait until a named resource reports the given condition.
pub async fn condition(
    runner: &dyn Runner,
    namespace: &str,
    resource: &str,
    condition: &str,
    timeout: Duration,
) -> Result<()> {
    info!("Waiting up to {:?} for {} to reach {}", timeout, resource, condition);
    runner
        .run(
            None,
            &format!(
                "kubectl wait -n {namespace} --for=condition={condition} {resource} --timeout={}s",
                timeout.as_secs()
            ),
        )
        .await
}
