// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Child process execution for the external tools the harness drives.

use crate::error::{BenchError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Executes a command line in an optional working directory.
///
/// Output goes to the harness's own stdout/stderr so external tool output
/// interleaves with harness logs. Implementations never retry; a non-zero
/// exit or spawn failure is surfaced to the caller.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run a command with extra environment variables set on the child.
    async fn run_with_env(
        &self,
        dir: Option<&Path>,
        command: &str,
        envs: &[(&str, &str)],
    ) -> Result<()>;

    /// Run a command with the inherited environment.
    async fn run(&self, dir: Option<&Path>, command: &str) -> Result<()> {
        self.run_with_env(dir, command, &[]).await
    }
}

/// Production runner: hands the command line to `sh -c`.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

#[async_trait]
impl Runner for ShellRunner {
    async fn run_with_env(
        &self,
        dir: Option<&Path>,
        command: &str,
        envs: &[(&str, &str)],
    ) -> Result<()> {
        debug!("Running `{}` in {:?}", command, dir);

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        for (key, value) in envs {
            cmd.env(key, value);
        }

        let status = cmd.status().await.map_err(|source| BenchError::CommandSpawn {
            command: command.to_string(),
            source,
        })?;

        if !status.success() {
            return Err(BenchError::CommandFailed {
                command: command.to_string(),
                status,
            });
        }

        Ok(())
    }
}
