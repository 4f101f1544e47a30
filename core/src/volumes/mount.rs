use std::path::PathBuf;
use std::process::Command;
use log::debug;

use crate::constants::VOLUME_LABEL;
use crate::volumes::types::{LocateError, VolumeLocator};

const MOUNT_COMMAND: &str = "mount";

/// Keep mount points (third column of `mount` output) ending with `label`.
///
/// Handles both Linux (`dev on /media/x type vfat (..)`) and macOS
/// (`dev on /Volumes/x (msdos, ..)`) layouts.
pub fn parse_mount_table(output: &str, label: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(2))
        .filter(|mount_point| mount_point.ends_with(label))
        .map(PathBuf::from)
        .collect()
}

/// POSIX locator backed by the `mount` command.
#[derive(Debug, Clone)]
pub struct MountTableLocator {
    label: String,
}

impl MountTableLocator {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for MountTableLocator {
    fn default() -> Self {
        Self::new(VOLUME_LABEL)
    }
}

impl VolumeLocator for MountTableLocator {
    fn name(&self) -> &'static str {
        "mount-table"
    }

    fn locate(&self) -> Result<Vec<PathBuf>, LocateError> {
        let output = Command::new(MOUNT_COMMAND)
            .output()
            .map_err(|source| LocateError::Spawn { command: MOUNT_COMMAND, source })?;

        if !output.status.success() {
            return Err(LocateError::CommandFailed {
                command: MOUNT_COMMAND,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let volumes = parse_mount_table(&String::from_utf8_lossy(&output.stdout), &self.label);
        debug!("found {} volume(s) labelled {}", volumes.len(), self.label);
        Ok(volumes)
    }
}
