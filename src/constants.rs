// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Benchmark cluster identity
pub mod cluster {
    /// Name passed to `kind create cluster`
    pub const NAME: &str = "declcd-benchmark";
    /// Pinned kind node image
    pub const NODE_IMAGE: &str = "kindest/node:v1.29.4";
    /// Path the repository directory is mounted at inside every node
    pub const REPOSITORY_MOUNT: &str = "/repository";
}

/// GitOps controller under test
pub mod controller {
    /// Namespace the controller installs itself into
    pub const NAMESPACE: &str = "declcd-system";
    /// Name of the GitOpsProject created by `declcd install`
    pub const PROJECT_NAME: &str = "benchmark";
    /// Fully qualified project resource, as `kubectl` addresses it
    pub const PROJECT_RESOURCE: &str = "gitopsprojects.gitops.declcd.io/benchmark";
    /// Label selecting the primary controller pod
    pub const SHARD_LABEL: &str = "declcd/shard=primary";
    /// Git branch the controller reconciles from
    pub const BRANCH: &str = "main";
    /// Reconciliation interval in seconds handed to `declcd install`
    pub const INTERVAL_SECS: u64 = 3600;
}

/// Local registry endpoints
pub mod registry {
    /// Local port the in-cluster registry is forwarded to
    pub const IN_CLUSTER_LOCAL_PORT: u16 = 5000;
    /// In-cluster service host of the twuni registry chart
    pub const IN_CLUSTER_HOST: &str = "twuni-docker-registry.default.svc:5000";
    /// Host port the docker-container registry is published on
    pub const HOST_DOCKER_LOCAL_PORT: u16 = 5001;
    /// Container name of the docker-container registry
    pub const HOST_DOCKER_CONTAINER: &str = "declcd-benchmark-registry";
    /// Local port ChartMuseum is forwarded to
    pub const CHARTMUSEUM_LOCAL_PORT: u16 = 8080;
}

/// Sample workload image seeded for plain applications
pub mod sample_image {
    pub const IMAGE: &str = "gcr.io/kubernetes-e2e-test-images/echoserver";
    pub const TAG: &str = "2.2";
    pub const REPOSITORY: &str = "kubernetes-e2e-test-images/echoserver";
}

/// Timeouts and intervals observed by the harness
pub mod timeouts {
    use std::time::Duration;

    /// `kind create cluster --wait`
    pub const CLUSTER_CREATE: Duration = Duration::from_secs(300);
    /// Readiness wait after each supporting-service install
    pub const SERVICE_READY: Duration = Duration::from_secs(90);
    /// metrics-server availability before the benchmark starts
    pub const METRICS_READY: Duration = Duration::from_secs(60);
    /// Controller pod readiness
    pub const CONTROLLER_READY: Duration = Duration::from_secs(60);
    /// GitOpsProject `Running` condition
    pub const PROJECT_RUNNING: Duration = Duration::from_secs(60);
    /// GitOpsProject `Finished` condition
    pub const PROJECT_FINISHED: Duration = Duration::from_secs(600);
    /// Overall deadline for seeding the sample image
    pub const IMAGE_COPY_DEADLINE: Duration = Duration::from_secs(60);
    /// Backoff between image copy attempts
    pub const IMAGE_COPY_BACKOFF: Duration = Duration::from_secs(2);
    /// Resource poller tick interval
    pub const POLL_INTERVAL: Duration = Duration::from_secs(3);
    /// Grace period before teardown so the poller sees the settled state
    pub const SETTLE: Duration = Duration::from_secs(10);
}
