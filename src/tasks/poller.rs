// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Periodic best-effort resource usage poller.

use super::Shutdown;
use crate::cmd::Runner;
use crate::constants::{controller, timeouts};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

/// Polls `kubectl top pod` on a fixed interval until shutdown fires.
/// Poll failures are diagnostic noise, logged and ignored.
pub struct ResourcePoller {
    runner: Arc<dyn Runner>,
    shutdown: Shutdown,
}

impl ResourcePoller {
    pub fn spawn(runner: Arc<dyn Runner>, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(ResourcePoller { runner, shutdown }.run())
    }

    async fn run(self) {
        info!("Starting resource poller, ticking every {:?}", timeouts::POLL_INTERVAL);
        let command = format!("kubectl top pod --namespace {}", controller::NAMESPACE);
        let mut ticker = interval(timeouts::POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = self.shutdown.fired() => {
                    debug!("Resource poller stopping");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.runner.run(None, &command).await {
                        debug!("Resource poll failed (ignored): {}", err);
                    }
                }
            }
        }
    }
}
