// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to spawn `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed: {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("Cluster config serialization failed: {0}")]
    ClusterConfig(#[from] serde_yaml::Error),

    #[error("Deadline exceeded copying image {image} to {target}")]
    CopyDeadline { image: String, target: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
