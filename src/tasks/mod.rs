// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Background tasks and the shutdown signal coordinating them.

pub mod poller;
pub mod port_forward;

pub use poller::ResourcePoller;
pub use port_forward::PortForward;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Single-fire shutdown signal, broadcast to every background task.
///
/// Fired either from the OS signal handler or from the end of the main
/// sequence; a second fire is a no-op. Observers that subscribe after the
/// fire still observe it.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

struct ShutdownInner {
    fired: AtomicBool,
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Shutdown {
            inner: Arc::new(ShutdownInner {
                fired: AtomicBool::new(false),
                tx,
            }),
        }
    }

    /// Fire the signal. Only the first call has an effect.
    pub fn fire(&self) {
        if !self.inner.fired.swap(true, Ordering::SeqCst) {
            info!("Shutdown signal fired");
            let _ = self.inner.tx.send(true);
        }
    }

    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Resolves once the signal has fired.
    pub async fn fired(&self) {
        let mut rx = self.inner.tx.subscribe();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire the shutdown signal on SIGINT or SIGTERM.
///
/// The returned handle never completes on its own; the driver aborts it
/// once the run is over.
pub fn spawn_signal_handler(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.fire();
    })
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => info!("Received SIGINT"),
                _ = sigterm.recv() => info!("Received SIGTERM"),
            }
        }
        Err(err) => {
            warn!("Cannot install SIGTERM handler: {}", err);
            let _ = ctrl_c.await;
            info!("Received SIGINT");
        }
    }
}
