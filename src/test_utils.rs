// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for faking external command execution.

use crate::cmd::Runner;
use crate::error::{BenchError, Result};
use async_trait::async_trait;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

/// One recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub dir: Option<PathBuf>,
    pub command: String,
    pub envs: Vec<(String, String)>,
}

#[derive(Debug)]
struct Failure {
    pattern: String,
    /// None fails every match, Some(n) fails the first n matches
    remaining: Option<usize>,
}

/// A fake runner that records every invocation and returns scripted
/// failures for commands matching configured substrings.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failures: Arc<Mutex<Vec<Failure>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command containing `pattern`
    pub fn fail_on(self, pattern: &str) -> Self {
        self.failures.lock().unwrap().push(Failure {
            pattern: pattern.to_string(),
            remaining: None,
        });
        self
    }

    /// Fail the first `times` commands containing `pattern`, then succeed
    pub fn fail_times(self, pattern: &str, times: usize) -> Self {
        self.failures.lock().unwrap().push(Failure {
            pattern: pattern.to_string(),
            remaining: Some(times),
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded command lines, in invocation order
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.command.clone())
            .collect()
    }

    /// Number of recorded commands containing `pattern`
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.command.contains(pattern))
            .count()
    }

    fn should_fail(&self, command: &str) -> bool {
        let mut failures = self.failures.lock().unwrap();
        for failure in failures.iter_mut() {
            if !command.contains(&failure.pattern) {
                continue;
            }
            match failure.remaining {
                None => return true,
                Some(0) => continue,
                Some(ref mut n) => {
                    *n -= 1;
                    return true;
                }
            }
        }
        false
    }
}

#[async_trait]
impl Runner for RecordingRunner {
    async fn run_with_env(
        &self,
        dir: Option<&Path>,
        command: &str,
        envs: &[(&str, &str)],
    ) -> Result<()> {
        self.calls.lock().unwrap().push(RecordedCall {
            dir: dir.map(Path::to_path_buf),
            command: command.to_string(),
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        if self.should_fail(command) {
            return Err(BenchError::CommandFailed {
                command: command.to_string(),
                status: ExitStatus::from_raw(256),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let runner = RecordingRunner::new();
        runner.run(None, "first").await.unwrap();
        runner.run(Some(Path::new("/tmp")), "second").await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].command, "first");
        assert_eq!(calls[1].dir.as_deref(), Some(Path::new("/tmp")));
    }

    #[tokio::test]
    async fn test_fail_times_recovers_after_scripted_failures() {
        let runner = RecordingRunner::new().fail_times("flaky", 1);
        assert!(runner.run(None, "flaky command").await.is_err());
        assert!(runner.run(None, "flaky command").await.is_ok());
    }
}
