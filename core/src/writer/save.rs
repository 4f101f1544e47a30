use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::constants::HEX_EXTENSION;
use crate::writer::types::{DestinationOutcome, WriteError, WriteReport};

fn validate_image(image: &str) -> Result<(), WriteError> {
    if image.is_empty() {
        return Err(WriteError::EmptyImage);
    }
    if !image.is_ascii() {
        return Err(WriteError::NotAscii);
    }
    Ok(())
}

fn has_hex_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(HEX_EXTENSION)
}

/// Write one image to one `.hex` path. Returns the number of bytes written.
///
/// The extension is checked before the file is opened, so an invalid
/// destination is never touched.
pub fn save_hex(image: &str, path: &Path) -> Result<usize, WriteError> {
    validate_image(image)?;
    if !has_hex_extension(path) {
        return Err(WriteError::InvalidDestination { path: path.to_path_buf() });
    }
    fs::write(path, image.as_bytes())
        .map_err(|source| WriteError::Io { path: path.to_path_buf(), source })?;
    info!("wrote {} bytes to {}", image.len(), path.display());
    Ok(image.len())
}

/// Delivers a composite image to its destinations.
#[derive(Debug, Clone, Default)]
pub struct ImageWriter {
    local_copy: Option<PathBuf>,
    parallel: bool,
}

impl ImageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write the image here (parent directories are created).
    pub fn with_local_copy(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_copy = Some(path.into());
        self
    }

    /// Write destinations on scoped threads instead of one after another.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Write `image` to the local copy (if any) and to every destination.
    ///
    /// # Errors
    /// - `EmptyImage` / `NotAscii` before anything is written.
    /// - Local copy failures, since that copy is the one guaranteed artifact.
    ///
    /// Destination failures do not abort the batch; they are reported per
    /// destination in the returned `WriteReport`.
    pub fn persist(&self, image: &str, destinations: &[PathBuf]) -> Result<WriteReport, WriteError> {
        validate_image(image)?;

        let mut report = WriteReport::default();

        if let Some(path) = &self.local_copy {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|source| WriteError::Io { path: parent.to_path_buf(), source })?;
            }
            let written = save_hex(image, path)?;
            report.local_copy = Some((path.clone(), written));
        }

        report.destinations = if self.parallel && destinations.len() > 1 {
            debug!("writing {} destinations in parallel", destinations.len());
            write_parallel(image, destinations)?
        } else {
            destinations
                .iter()
                .map(|path| DestinationOutcome { path: path.clone(), result: save_hex(image, path) })
                .collect()
        };

        for failed in report.failed() {
            if let Err(e) = &failed.result {
                warn!("destination {} failed: {}", failed.path.display(), e);
            }
        }

        Ok(report)
    }
}

fn write_parallel(image: &str, destinations: &[PathBuf]) -> Result<Vec<DestinationOutcome>, WriteError> {
    crossbeam::thread::scope(|s| {
        let handles: Vec<_> = destinations
            .iter()
            .map(|path| s.spawn(move |_| save_hex(image, path)))
            .collect();

        handles
            .into_iter()
            .zip(destinations)
            .map(|(handle, path)| DestinationOutcome {
                path: path.clone(),
                result: handle.join().unwrap_or(Err(WriteError::WorkerPanicked)),
            })
            .collect()
    })
    .map_err(|_| WriteError::WorkerPanicked)
}
