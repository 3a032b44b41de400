// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed cluster-config document fed to `kind create cluster`.

use crate::constants::cluster;
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub api_version: String,
    pub kind: String,
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containerd_config_patches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub role: String,
    pub image: String,
    pub extra_mounts: Vec<Mount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mount {
    pub host_path: String,
    pub container_path: String,
}

impl ClusterConfig {
    /// One control-plane and one worker node, both on the pinned node image
    /// and both mounting the repository directory at the path the controller
    /// pulls from.
    pub fn benchmark(repository_dir: &Path, containerd_config_patches: Vec<String>) -> Self {
        let node = |role: &str| Node {
            role: role.to_string(),
            image: cluster::NODE_IMAGE.to_string(),
            extra_mounts: vec![Mount {
                host_path: repository_dir.display().to_string(),
                container_path: cluster::REPOSITORY_MOUNT.to_string(),
            }],
        };

        ClusterConfig {
            api_version: "kind.x-k8s.io/v1alpha4".to_string(),
            kind: "Cluster".to_string(),
            nodes: vec![node("control-plane"), node("worker")],
            containerd_config_patches,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_benchmark_config_mounts_repository_on_both_nodes() {
        let config = ClusterConfig::benchmark(&PathBuf::from("/work/repository"), vec![]);
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.nodes[0].role, "control-plane");
        assert_eq!(config.nodes[1].role, "worker");
        for node in &config.nodes {
            assert_eq!(node.image, cluster::NODE_IMAGE);
            assert_eq!(node.extra_mounts[0].host_path, "/work/repository");
            assert_eq!(node.extra_mounts[0].container_path, "/repository");
        }
    }

    #[test]
    fn test_yaml_uses_kind_field_names() {
        let config = ClusterConfig::benchmark(&PathBuf::from("/work/repository"), vec![]);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("apiVersion: kind.x-k8s.io/v1alpha4"));
        assert!(yaml.contains("kind: Cluster"));
        assert!(yaml.contains("hostPath: /work/repository"));
        assert!(yaml.contains("containerPath: /repository"));
        assert!(!yaml.contains("containerdConfigPatches"));
    }

    #[test]
    fn test_containerd_patches_are_emitted_when_present() {
        let patch = "[plugins.\"io.containerd.grpc.v1.cri\".registry]\n  config_path = \"\"";
        let config =
            ClusterConfig::benchmark(&PathBuf::from("/work/repository"), vec![patch.to_string()]);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("containerdConfigPatches"));
        assert!(yaml.contains("io.containerd.grpc.v1.cri"));
    }
}
