// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deadline-bounded retrying image copy via `crane`.

use crate::cmd::Runner;
use crate::constants::timeouts;
use crate::error::{BenchError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

/// Copy `image:tag` into `target:tag`, retrying transient failures with a
/// fixed backoff until the deadline elapses. The deadline is checked before
/// each attempt, so the copier never retries indefinitely.
pub async fn copy_image(
    runner: &dyn Runner,
    image: &str,
    tag: &str,
    target: &str,
    deadline: Duration,
) -> Result<()> {
    let deadline = Instant::now() + deadline;
    let command = format!("crane copy {image}:{tag} {target}:{tag}");

    loop {
        if Instant::now() >= deadline {
            return Err(BenchError::CopyDeadline {
                image: format!("{image}:{tag}"),
                target: target.to_string(),
            });
        }

        match runner.run(None, &command).await {
            Ok(()) => {
                info!("Copied {}:{} to {}", image, tag, target);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Image copy failed, retrying in {:?}: {}",
                    timeouts::IMAGE_COPY_BACKOFF,
                    err
                );
                sleep(timeouts::IMAGE_COPY_BACKOFF).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_the_retry_loop() {
        let runner = RecordingRunner::new().fail_on("crane copy");

        let started = Instant::now();
        let err = copy_image(&runner, "gcr.io/e2e/echoserver", "2.2", "localhost:5000/echoserver", Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(matches!(err, BenchError::CopyDeadline { .. }));
        // Terminates within deadline + one backoff interval
        assert!(started.elapsed() <= Duration::from_secs(12));
        // 10s deadline with a 2s backoff allows at most 5 failed attempts
        assert_eq!(runner.commands().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_first_success() {
        let runner = RecordingRunner::new();

        copy_image(&runner, "gcr.io/e2e/echoserver", "2.2", "localhost:5000/echoserver", Duration::from_secs(10))
            .await
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0],
            "crane copy gcr.io/e2e/echoserver:2.2 localhost:5000/echoserver:2.2"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let runner = RecordingRunner::new().fail_times("crane copy", 2);

        copy_image(&runner, "gcr.io/e2e/echoserver", "2.2", "localhost:5000/echoserver", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(runner.commands().len(), 3);
    }
}
