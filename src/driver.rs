// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sequential orchestration of the benchmark run.

use crate::charts;
use crate::cluster::{self, wait, ClusterConfig};
use crate::cmd::Runner;
use crate::config::Config;
use crate::constants::{registry as registry_constants, sample_image, timeouts};
use crate::controller;
use crate::manifests;
use crate::registry::{self, PortForwardSpec, RegistryTopology};
use crate::repo;
use crate::tasks::{spawn_signal_handler, PortForward, ResourcePoller, Shutdown};
use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

/// Deferred teardown, unwound in reverse registration order once the run
/// is over. Failures are logged, not escalated: the process is exiting.
#[derive(Default)]
struct CleanupStack {
    actions: Vec<CleanupAction>,
}

enum CleanupAction {
    Command(String),
    RemoveDir(PathBuf),
}

impl CleanupStack {
    fn defer_command(&mut self, command: String) {
        self.actions.push(CleanupAction::Command(command));
    }

    fn defer_remove_dir(&mut self, path: PathBuf) {
        self.actions.push(CleanupAction::RemoveDir(path));
    }

    async fn unwind(self, runner: &dyn Runner) {
        for action in self.actions.into_iter().rev() {
            match action {
                CleanupAction::Command(command) => {
                    if let Err(err) = runner.run(None, &command).await {
                        warn!("Cleanup command `{}` failed: {}", command, err);
                    }
                }
                CleanupAction::RemoveDir(path) => {
                    if let Err(err) = fs::remove_dir_all(&path) {
                        warn!("Cleanup of {} failed: {}", path.display(), err);
                    }
                }
            }
        }
    }
}

/// Owns the shutdown signal and coordinates the background tasks with the
/// strictly sequential main sequence.
pub struct Driver {
    config: Config,
    runner: Arc<dyn Runner>,
    registry: Box<dyn RegistryTopology>,
    shutdown: Shutdown,
}

impl Driver {
    pub fn new(config: Config, runner: Arc<dyn Runner>, registry: Box<dyn RegistryTopology>) -> Self {
        Driver {
            config,
            runner,
            registry,
            shutdown: Shutdown::new(),
        }
    }

    /// Run the benchmark. Whatever the sequence does, the shutdown signal
    /// fires, every background task is joined and the cleanup stack is
    /// unwound before this returns.
    pub async fn run(&self) -> anyhow::Result<()> {
        let signal_handle = spawn_signal_handler(self.shutdown.clone());
        let mut cleanup = CleanupStack::default();
        let mut tasks: Vec<JoinHandle<()>> = Vec::new();

        let result = self.execute(&mut cleanup, &mut tasks).await;

        self.shutdown.fire();
        for task in tasks {
            if let Err(err) = task.await {
                warn!("Background task failed to join: {}", err);
            }
        }
        signal_handle.abort();

        cleanup.unwind(self.runner.as_ref()).await;
        result
    }

    async fn execute(
        &self,
        cleanup: &mut CleanupStack,
        tasks: &mut Vec<JoinHandle<()>>,
    ) -> anyhow::Result<()> {
        let config = &self.config;
        let runner = self.runner.as_ref();
        info!("Registry topology: {}", self.registry.name());

        // Rebuild the manifest tree from a clean slate
        let workload_image = self
            .registry
            .workload_image(sample_image::REPOSITORY, sample_image::TAG);
        manifests::generate(config, &workload_image).context("generating manifests")?;

        let charts_dir = config.charts_dir();
        fs::create_dir_all(&charts_dir).context("creating charts scratch directory")?;
        cleanup.defer_remove_dir(charts_dir.clone());

        // Cluster up, teardown deferred before anything else can fail
        let cluster_config = ClusterConfig::benchmark(
            &config.repository_dir(),
            self.registry.containerd_config_patches(),
        );
        println!("{}", cluster_config.to_yaml()?);
        cluster_config.write(&config.kind_config_path())?;
        cluster::create(runner, &config.kind_config_path())
            .await
            .context("creating cluster")?;
        cleanup.defer_command(cluster::delete_command());
        if let Some(teardown) = self.registry.teardown_command() {
            cleanup.defer_command(teardown);
        }

        // Supporting services
        runner
            .run(
                None,
                "helm repo add metrics-server https://kubernetes-sigs.github.io/metrics-server/",
            )
            .await?;
        runner
            .run(
                None,
                "helm install metrics-server metrics-server/metrics-server --set args=\"{--kubelet-insecure-tls}\"",
            )
            .await?;

        self.registry
            .install(runner)
            .await
            .context("installing registry")?;

        if config.yaml_helm_app_count > 0 {
            runner
                .run(None, "helm repo add chartmuseum https://chartmuseum.github.io/charts")
                .await?;
            runner
                .run(
                    None,
                    "helm install chartmuseum chartmuseum/chartmuseum --set env.open.DISABLE_API=false",
                )
                .await?;
            wait::deployment_available(runner, None, "chartmuseum", timeouts::SERVICE_READY)
                .await?;
        }

        // Side-channel forwards; nothing downstream is gated on them
        if let Some(spec) = self.registry.port_forward() {
            tasks.push(PortForward::spawn(spec, self.shutdown.clone()));
        }
        if config.yaml_helm_app_count > 0 {
            tasks.push(PortForward::spawn(
                PortForwardSpec {
                    name: "chartmuseum".to_string(),
                    command: format!(
                        "kubectl port-forward svc/chartmuseum {}",
                        registry_constants::CHARTMUSEUM_LOCAL_PORT
                    ),
                },
                self.shutdown.clone(),
            ));
        }

        // Fake Helm applications, OCI category first
        for index in 0..config.oci_helm_app_count {
            charts::install_helm_app(
                runner,
                &charts_dir,
                &config.infrastructure_dir(),
                index,
                &self.registry.chart_repo_url(),
                &self.registry.chart_push_url(),
            )
            .await
            .context("installing OCI Helm application")?;
        }
        for offset in 0..config.yaml_helm_app_count {
            charts::install_helm_app(
                runner,
                &charts_dir,
                &config.infrastructure_dir(),
                config.oci_helm_app_count + offset,
                "http://chartmuseum.default.svc:8080",
                &format!(
                    "http://localhost:{}/api/charts",
                    registry_constants::CHARTMUSEUM_LOCAL_PORT
                ),
            )
            .await
            .context("installing HTTP Helm application")?;
        }

        // Seed the workload image the generated deployments pull
        if config.app_count > 0 {
            registry::image::copy_image(
                runner,
                sample_image::IMAGE,
                sample_image::TAG,
                &self.registry.image_push_target(sample_image::REPOSITORY),
                timeouts::IMAGE_COPY_DEADLINE,
            )
            .await
            .context("seeding sample image")?;
        }

        wait::deployment_available(runner, None, "metrics-server", timeouts::METRICS_READY)
            .await?;

        repo::commit_all(runner, &config.repository_dir())
            .await
            .context("committing repository")?;

        controller::install(runner, &config.repository_dir())
            .await
            .context("installing controller")?;

        tasks.push(ResourcePoller::spawn(
            self.runner.clone(),
            self.shutdown.clone(),
        ));

        controller::wait_until_finished(runner)
            .await
            .context("waiting for reconciliation")?;
        controller::print_transition_times(runner).await?;

        // Let the poller capture the settled state before teardown
        sleep(timeouts::SETTLE).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Opts, RegistryFlavor};
    use crate::registry::InClusterRegistry;
    use crate::test_utils::RecordingRunner;

    fn make_driver(
        workdir: PathBuf,
        apps: i64,
        oci: i64,
        yaml: i64,
        runner: RecordingRunner,
    ) -> Driver {
        let opts = Opts {
            apps,
            oci_helm_apps: oci,
            yaml_helm_apps: yaml,
            registry: RegistryFlavor::InCluster,
        };
        Driver::new(
            Config::new(&opts, workdir),
            Arc::new(runner),
            Box::new(InClusterRegistry),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_sequence_with_two_plain_apps() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let driver = make_driver(tmp.path().to_path_buf(), 2, 0, 0, runner.clone());

        driver.run().await.unwrap();

        let apps_dir = driver.config.apps_dir();
        assert!(apps_dir.join("alpha.cue").exists());
        assert!(apps_dir.join("app0/app0.cue").exists());
        assert!(apps_dir.join("app1/app1.cue").exists());
        assert!(fs::read_dir(driver.config.infrastructure_dir()).unwrap().next().is_none());

        // Scratch directory is gone, cluster config survives
        assert!(!driver.config.charts_dir().exists());
        assert!(driver.config.kind_config_path().exists());

        let commands = runner.commands();
        assert_eq!(runner.count_matching("kind create cluster"), 1);
        assert_eq!(runner.count_matching("kind delete cluster"), 1);
        assert_eq!(runner.count_matching("crane copy"), 1);
        assert_eq!(runner.count_matching("declcd install"), 1);
        assert_eq!(runner.count_matching("condition=Finished"), 1);
        // No Helm applications were requested
        assert_eq!(runner.count_matching("helm create"), 0);
        assert_eq!(runner.count_matching("chartmuseum"), 0);
        // Teardown runs after the reconciliation gates
        let delete_pos = commands.iter().position(|c| c.contains("kind delete")).unwrap();
        let finished_pos = commands.iter().position(|c| c.contains("condition=Finished")).unwrap();
        assert!(delete_pos > finished_pos);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cluster_creation_failure_skips_installs_but_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().fail_on("kind create cluster");
        let driver = make_driver(tmp.path().to_path_buf(), 2, 0, 0, runner.clone());

        let result = driver.run().await;
        assert!(result.is_err());

        // No installation or wait command ran after the failure
        assert_eq!(runner.count_matching("helm"), 0);
        assert_eq!(runner.count_matching("kubectl wait"), 0);
        assert_eq!(runner.count_matching("declcd"), 0);
        // The cluster delete still ran exactly once
        assert_eq!(runner.count_matching("kind delete cluster"), 1);
        // The scratch directory was still removed
        assert!(!driver.config.charts_dir().exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_helm_apps_render_manifests_and_push_charts() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let driver = make_driver(tmp.path().to_path_buf(), 0, 2, 1, runner.clone());

        driver.run().await.unwrap();

        let infrastructure_dir = driver.config.infrastructure_dir();
        for i in 0..3 {
            assert!(infrastructure_dir.join(format!("helmapp{i}/helmapp{i}.cue")).exists());
        }
        // Two OCI pushes, one raw HTTP upload
        assert_eq!(runner.count_matching("helm push"), 2);
        assert_eq!(runner.count_matching("curl --data-binary"), 1);
        // ChartMuseum was installed for the HTTP category
        assert_eq!(runner.count_matching("helm install chartmuseum"), 1);
        // No plain apps, so no image seeding
        assert_eq!(runner.count_matching("crane copy"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_aborts_but_background_tasks_are_joined() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().fail_on("condition=Running");
        let driver = make_driver(tmp.path().to_path_buf(), 1, 0, 0, runner.clone());

        let result = driver.run().await;
        assert!(result.is_err());

        // The Finished gate never ran, teardown still did
        assert_eq!(runner.count_matching("condition=Finished"), 0);
        assert_eq!(runner.count_matching("kind delete cluster"), 1);
    }
}
