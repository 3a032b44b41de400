// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry topologies the benchmark can provision for chart and image pushes.

pub mod image;
mod host_docker;
mod in_cluster;

pub use host_docker::HostDockerRegistry;
pub use in_cluster::InClusterRegistry;

use crate::cmd::Runner;
use crate::config::RegistryFlavor;
use crate::error::Result;
use async_trait::async_trait;

/// A long-lived `kubectl port-forward` a topology needs on the host side.
#[derive(Debug, Clone)]
pub struct PortForwardSpec {
    /// Short name used in log lines
    pub name: String,
    /// Full command line of the forward process
    pub command: String,
}

/// Where the registry lives and how charts and images reach it.
///
/// The two implementations reflect the two observed deployments: a registry
/// chart inside the cluster reached through a port-forward, and a host-level
/// docker container reached through a containerd mirror on the nodes.
#[async_trait]
pub trait RegistryTopology: Send + Sync {
    fn name(&self) -> &'static str;

    /// Containerd patches to inject into the cluster-config document.
    fn containerd_config_patches(&self) -> Vec<String> {
        Vec::new()
    }

    /// Provision the registry. Runs after the cluster exists.
    async fn install(&self, runner: &dyn Runner) -> Result<()>;

    /// Teardown command for the cleanup stack, if the topology owns
    /// host-level state.
    fn teardown_command(&self) -> Option<String> {
        None
    }

    /// Port-forward backing host access, if the topology needs one.
    fn port_forward(&self) -> Option<PortForwardSpec> {
        None
    }

    /// Chart repository URL as the controller resolves it in-cluster.
    fn chart_repo_url(&self) -> String;

    /// Chart push URL reachable from the host.
    fn chart_push_url(&self) -> String;

    /// Image push target reachable from the host, without a tag.
    fn image_push_target(&self, repository: &str) -> String;

    /// Image reference generated workloads pull in-cluster.
    fn workload_image(&self, repository: &str, tag: &str) -> String;
}

/// Select the topology implementation for a parsed flag value.
pub fn select(flavor: RegistryFlavor) -> Box<dyn RegistryTopology> {
    match flavor {
        RegistryFlavor::InCluster => Box::new(InClusterRegistry),
        RegistryFlavor::HostDocker => Box::new(HostDockerRegistry),
    }
}
