// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Long-lived port-forward child process, killed on shutdown.

use super::Shutdown;
use crate::registry::PortForwardSpec;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Runs a port-forward process until it exits naturally or the shutdown
/// signal fires. The forward serves a side channel (local registry access),
/// so failures are logged, never propagated.
pub struct PortForward {
    spec: PortForwardSpec,
    shutdown: Shutdown,
}

impl PortForward {
    pub fn spawn(spec: PortForwardSpec, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(PortForward { spec, shutdown }.run())
    }

    async fn run(mut self) {
        info!("Starting {} port-forward: {}", self.spec.name, self.spec.command);

        let mut child = match Command::new("sh").arg("-c").arg(&self.spec.command).spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!("Failed to start {} port-forward: {}", self.spec.name, err);
                return;
            }
        };

        let natural_exit = tokio::select! {
            status = child.wait() => Some(status),
            _ = self.shutdown.fired() => None,
        };

        match natural_exit {
            Some(Ok(status)) => {
                warn!("{} port-forward exited: {}", self.spec.name, status);
            }
            Some(Err(err)) => {
                warn!("{} port-forward wait failed: {}", self.spec.name, err);
            }
            None => {
                info!("Stopping {} port-forward", self.spec.name);
                if let Err(err) = child.start_kill() {
                    warn!("Failed to kill {} port-forward: {}", self.spec.name, err);
                }
                // Reap so no child is left dangling after interrupt
                let _ = child.wait().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn make_spec(command: &str) -> PortForwardSpec {
        PortForwardSpec {
            name: "test".to_string(),
            command: command.to_string(),
        }
    }

    #[tokio::test]
    async fn test_shutdown_kills_long_lived_child() {
        let shutdown = Shutdown::new();
        let handle = PortForward::spawn(make_spec("sleep 30"), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());

        shutdown.fire();
        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_natural_exit_completes_without_shutdown() {
        let shutdown = Shutdown::new();
        let handle = PortForward::spawn(make_spec("true"), shutdown);
        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failing_child_is_swallowed() {
        let shutdown = Shutdown::new();
        let handle = PortForward::spawn(make_spec("exit 1"), shutdown);
        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }
}
