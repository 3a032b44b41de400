// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::path::PathBuf;

/// Command line surface of the benchmark harness
#[derive(Debug, Parser)]
#[command(name = "declcd-benchmark", about = "Benchmark harness for the declcd GitOps controller")]
pub struct Opts {
    /// Number of plain applications to generate
    #[arg(long = "apps", default_value_t = 1)]
    pub apps: i64,

    /// Number of Helm applications backed by an OCI chart repository
    #[arg(long = "oci-helm-apps", default_value_t = 0)]
    pub oci_helm_apps: i64,

    /// Number of Helm applications backed by an HTTP chart repository
    #[arg(long = "yaml-helm-apps", default_value_t = 0)]
    pub yaml_helm_apps: i64,

    /// Registry topology to provision for chart and image pushes
    #[arg(long = "registry", value_enum, default_value = "in-cluster")]
    pub registry: RegistryFlavor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegistryFlavor {
    /// Registry running inside the cluster, installed via Helm
    InCluster,
    /// Registry running as a host-level docker container
    HostDocker,
}

/// Resolved harness configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app_count: usize,
    pub oci_helm_app_count: usize,
    pub yaml_helm_app_count: usize,
    pub registry: RegistryFlavor,
    /// Directory the harness runs in; all generated state lives below it
    pub workdir: PathBuf,
}

impl Config {
    /// Build the configuration from parsed flags and the current directory
    pub fn from_opts(opts: &Opts) -> Result<Self> {
        let workdir = env::current_dir().context("cannot determine working directory")?;
        Ok(Self::new(opts, workdir))
    }

    /// Negative counts degrade to zero, meaning "skip that category"
    pub fn new(opts: &Opts, workdir: PathBuf) -> Self {
        Config {
            app_count: opts.apps.max(0) as usize,
            oci_helm_app_count: opts.oci_helm_apps.max(0) as usize,
            yaml_helm_app_count: opts.yaml_helm_apps.max(0) as usize,
            registry: opts.registry,
            workdir,
        }
    }

    /// Root of the generated GitOps repository
    pub fn repository_dir(&self) -> PathBuf {
        self.workdir.join("repository")
    }

    pub fn apps_dir(&self) -> PathBuf {
        self.repository_dir().join("apps")
    }

    pub fn infrastructure_dir(&self) -> PathBuf {
        self.repository_dir().join("infrastructure")
    }

    /// Scratch directory for packaged Helm charts, removed at end of run
    pub fn charts_dir(&self) -> PathBuf {
        self.workdir.join("charts")
    }

    pub fn kind_config_path(&self) -> PathBuf {
        self.workdir.join("kind-config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_opts(apps: i64, oci: i64, yaml: i64) -> Opts {
        Opts {
            apps,
            oci_helm_apps: oci,
            yaml_helm_apps: yaml,
            registry: RegistryFlavor::InCluster,
        }
    }

    #[test]
    fn test_negative_counts_degrade_to_zero() {
        let config = Config::new(&make_opts(-3, -1, 0), PathBuf::from("/tmp/bench"));
        assert_eq!(config.app_count, 0);
        assert_eq!(config.oci_helm_app_count, 0);
        assert_eq!(config.yaml_helm_app_count, 0);
    }

    #[test]
    fn test_paths_derive_from_workdir() {
        let config = Config::new(&make_opts(2, 0, 0), PathBuf::from("/tmp/bench"));
        assert_eq!(config.repository_dir(), PathBuf::from("/tmp/bench/repository"));
        assert_eq!(config.apps_dir(), PathBuf::from("/tmp/bench/repository/apps"));
        assert_eq!(
            config.infrastructure_dir(),
            PathBuf::from("/tmp/bench/repository/infrastructure")
        );
        assert_eq!(config.charts_dir(), PathBuf::from("/tmp/bench/charts"));
        assert_eq!(
            config.kind_config_path(),
            PathBuf::from("/tmp/bench/kind-config.yaml")
        );
    }
}
