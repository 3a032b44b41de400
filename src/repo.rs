// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Local git repository the controller reconciles from.

use crate::cmd::Runner;
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Initialize the repository and commit the generated manifest tree. The
/// controller pulls from this local repository, so the tree must be
/// committed before the controller is installed.
pub async fn commit_all(runner: &dyn Runner, dir: &Path) -> Result<()> {
    info!("Committing manifest tree in {}", dir.display());
    runner.run(Some(dir), "git init").await?;
    runner.run(Some(dir), "git add .").await?;
    runner.run(Some(dir), "git commit -m \"Init\"").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_commits_in_order_inside_the_repository() {
        let runner = RecordingRunner::new();
        commit_all(&runner, Path::new("/work/repository")).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].command, "git init");
        assert_eq!(calls[1].command, "git add .");
        assert_eq!(calls[2].command, "git commit -m \"Init\"");
        for call in calls {
            assert_eq!(call.dir, Some(PathBuf::from("/work/repository")));
        }
    }
}
