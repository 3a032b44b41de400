// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-cluster registry installed from the twuni Helm chart.

use super::{PortForwardSpec, RegistryTopology};
use crate::cluster::wait;
use crate::cmd::Runner;
use crate::constants::{registry, timeouts};
use crate::error::Result;
use async_trait::async_trait;

pub struct InClusterRegistry;

#[async_trait]
impl RegistryTopology for InClusterRegistry {
    fn name(&self) -> &'static str {
        "in-cluster"
    }

    async fn install(&self, runner: &dyn Runner) -> Result<()> {
        runner
            .run(None, "helm repo add twuni https://helm.twun.io")
            .await?;
        runner
            .run(
                None,
                "helm install twuni twuni/docker-registry --set persistence.enabled=true",
            )
            .await?;
        wait::deployment_available(
            runner,
            None,
            "twuni-docker-registry",
            timeouts::SERVICE_READY,
        )
        .await
    }

    fn port_forward(&self) -> Option<PortForwardSpec> {
        Some(PortForwardSpec {
            name: "registry".to_string(),
            command: format!(
                "kubectl port-forward svc/twuni-docker-registry {}",
                registry::IN_CLUSTER_LOCAL_PORT
            ),
        })
    }

    fn chart_repo_url(&self) -> String {
        format!("oci://{}/charts", registry::IN_CLUSTER_HOST)
    }

    fn chart_push_url(&self) -> String {
        format!("oci://localhost:{}/charts", registry::IN_CLUSTER_LOCAL_PORT)
    }

    fn image_push_target(&self, repository: &str) -> String {
        format!("localhost:{}/{}", registry::IN_CLUSTER_LOCAL_PORT, repository)
    }

    fn workload_image(&self, repository: &str, tag: &str) -> String {
        format!("{}/{}:{}", registry::IN_CLUSTER_HOST, repository, tag)
    }
}
