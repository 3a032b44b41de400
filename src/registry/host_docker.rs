// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host-level registry container with a containerd mirror on the nodes.

use super::RegistryTopology;
use crate::cmd::Runner;
use crate::constants::registry;
use crate::error::Result;
use async_trait::async_trait;

pub struct HostDockerRegistry;

#[async_trait]
impl RegistryTopology for HostDockerRegistry {
    fn name(&self) -> &'static str {
        "host-docker"
    }

    fn containerd_config_patches(&self) -> Vec<String> {
        vec![format!(
            "[plugins.\"io.containerd.grpc.v1.cri\".registry.mirrors.\"localhost:{}\"]\n  endpoint = [\"http://{}:5000\"]",
            registry::HOST_DOCKER_LOCAL_PORT,
            registry::HOST_DOCKER_CONTAINER
        )]
    }

    async fn install(&self, runner: &dyn Runner) -> Result<()> {
        runner
            .run(
                None,
                &format!(
                    "docker run -d --restart=always -p 127.0.0.1:{}:5000 --name {} registry:2",
                    registry::HOST_DOCKER_LOCAL_PORT,
                    registry::HOST_DOCKER_CONTAINER
                ),
            )
            .await?;
        // The kind network exists once the cluster does
        runner
            .run(
                None,
                &format!("docker network connect kind {}", registry::HOST_DOCKER_CONTAINER),
            )
            .await
    }

    fn teardown_command(&self) -> Option<String> {
        Some(format!("docker rm -f {}", registry::HOST_DOCKER_CONTAINER))
    }

    fn chart_repo_url(&self) -> String {
        format!("oci://{}:5000/charts", registry::HOST_DOCKER_CONTAINER)
    }

    fn chart_push_url(&self) -> String {
        format!("oci://localhost:{}/charts", registry::HOST_DOCKER_LOCAL_PORT)
    }

    fn image_push_target(&self, repository: &str) -> String {
        format!("localhost:{}/{}", registry::HOST_DOCKER_LOCAL_PORT, repository)
    }

    fn workload_image(&self, repository: &str, tag: &str) -> String {
        // Resolved on the nodes through the containerd mirror
        format!(
            "localhost:{}/{}:{}",
            registry::HOST_DOCKER_LOCAL_PORT,
            repository,
            tag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_port_forward_and_container_teardown() {
        let topology = HostDockerRegistry;
        assert!(topology.port_forward().is_none());
        assert_eq!(
            topology.teardown_command().as_deref(),
            Some("docker rm -f declcd-benchmark-registry")
        );
    }

    #[test]
    fn test_containerd_mirror_points_at_the_container() {
        let topology = HostDockerRegistry;
        let patches = topology.containerd_config_patches();
        assert_eq!(patches.len(), 1);
        assert!(patches[0].contains("mirrors.\"localhost:5001\""));
        assert!(patches[0].contains("http://declcd-benchmark-registry:5000"));
    }
}
