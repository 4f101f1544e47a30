//! flash.rs
//!
//! End-to-end flashing: script → hex records → composite image → devices.
//!
//! Design notes:
//! - `FlashRequest` is plain data; the CLI fills it from arguments.
//! - `Flasher` owns the capabilities (minifier, volume locator) so tests can
//!   swap them without touching process state.
//! - Discovery failures never block the local copy; they are carried in the
//!   report instead.

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use serde::Serialize;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_SCRIPT_NAME, DEVICE_HEX_NAME, SCRIPT_EXTENSION};
use crate::frame::{FrameBuilder, FrameError};
use crate::records::{script_records, RecordStream};
use crate::splice::{splice, CompositeImage, RuntimeImage};
use crate::types::FlashError;
use crate::volumes::{default_locator, VolumeLocator};
use crate::writer::{DestinationOutcome, ImageWriter};

/// Where the script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// A `.py` file on disk.
    File(PathBuf),
    /// Script text supplied directly, with the name used for the local copy.
    Inline { name: String, bytes: Vec<u8> },
}

impl ScriptSource {
    pub fn inline(bytes: impl Into<Vec<u8>>) -> Self {
        ScriptSource::Inline { name: DEFAULT_SCRIPT_NAME.to_string(), bytes: bytes.into() }
    }

    /// Stem used to name the local copy. A blank inline name falls back to
    /// the default.
    pub fn name(&self) -> String {
        match self {
            ScriptSource::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_SCRIPT_NAME.to_string()),
            ScriptSource::Inline { name, .. } if name.trim().is_empty() => {
                DEFAULT_SCRIPT_NAME.to_string()
            }
            ScriptSource::Inline { name, .. } => name.clone(),
        }
    }

    pub fn load(&self) -> Result<Vec<u8>, FlashError> {
        match self {
            ScriptSource::File(path) => {
                if path.extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
                    return Err(FlashError::InvalidScriptPath { path: path.clone() });
                }
                read_file(path)
            }
            ScriptSource::Inline { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

/// Where the runtime image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSource {
    File(PathBuf),
    Text(String),
}

impl RuntimeSource {
    pub fn load(&self) -> Result<String, FlashError> {
        match self {
            RuntimeSource::File(path) => {
                let bytes = read_file(path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            RuntimeSource::Text(text) => Ok(text.clone()),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, FlashError> {
    fs::read(path).map_err(|source| FlashError::Io { path: path.to_path_buf(), source })
}

/// One flashing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashRequest {
    /// No script flashes the bare runtime.
    pub script: Option<ScriptSource>,
    pub runtime: Option<RuntimeSource>,
    /// Device volumes. Empty → ask the locator.
    pub targets: Vec<PathBuf>,
    pub minify: bool,
    /// Directory for the local copy; `None` disables it.
    pub output_dir: Option<PathBuf>,
    pub parallel: bool,
}

impl Default for FlashRequest {
    fn default() -> Self {
        Self {
            script: None,
            runtime: None,
            targets: Vec::new(),
            minify: false,
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            parallel: false,
        }
    }
}

impl FlashRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, source: ScriptSource) -> Self {
        self.script = Some(source);
        self
    }

    pub fn runtime(mut self, source: RuntimeSource) -> Self {
        self.runtime = Some(source);
        self
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = PathBuf>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Built image before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub script_name: String,
    pub records: RecordStream,
    pub image: CompositeImage,
}

/// What a flash did.
#[derive(Debug, Serialize)]
pub struct FlashReport {
    pub script_name: String,
    /// Script records spliced in, including the address record.
    pub script_records: usize,
    pub image_lines: usize,
    pub local_copy: Option<(PathBuf, usize)>,
    /// One entry per device, in target order.
    pub devices: Vec<DestinationOutcome>,
    /// Set when targets were to be discovered and discovery failed.
    pub discovery_error: Option<String>,
}

impl FlashReport {
    pub fn device_found(&self) -> bool {
        !self.devices.is_empty()
    }

    pub fn all_devices_ok(&self) -> bool {
        self.devices.iter().all(DestinationOutcome::is_ok)
    }
}

/// Runs flash requests with a fixed set of capabilities.
pub struct Flasher {
    frames: FrameBuilder,
    locator: Box<dyn VolumeLocator>,
}

impl Default for Flasher {
    fn default() -> Self {
        Self { frames: FrameBuilder::new(), locator: default_locator() }
    }
}

impl Flasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_builder(mut self, frames: FrameBuilder) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_locator<L: VolumeLocator + 'static>(mut self, locator: L) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Build the composite image without writing anything.
    pub fn prepare(&self, request: &FlashRequest) -> Result<PreparedImage, FlashError> {
        let (script_name, script) = match &request.script {
            Some(source) => (source.name(), source.load()?),
            None => (DEFAULT_SCRIPT_NAME.to_string(), Vec::new()),
        };

        // An empty script has nothing to minify.
        if request.minify && !script.is_empty() && !self.frames.can_minify() {
            return Err(FrameError::MinifierUnavailable.into());
        }
        let records = script_records(&script, &self.frames, request.minify)?;
        debug!("script {} → {} records", script_name, records.len());

        let runtime_text = match &request.runtime {
            Some(source) => source.load()?,
            None => String::new(),
        };
        let runtime = RuntimeImage::new(runtime_text)?;
        let image = splice(&runtime, &records);

        Ok(PreparedImage { script_name, records, image })
    }

    /// Build the image, keep a local copy, and write it to every device.
    pub fn flash(&self, request: &FlashRequest) -> Result<FlashReport, FlashError> {
        let prepared = self.prepare(request)?;

        let mut discovery_error = None;
        let volumes = if request.targets.is_empty() {
            match self.locator.locate() {
                Ok(found) => found,
                Err(e) => {
                    warn!("{} locator failed: {}", self.locator.name(), e);
                    discovery_error = Some(e.to_string());
                    Vec::new()
                }
            }
        } else {
            request.targets.clone()
        };
        let destinations: Vec<PathBuf> = volumes.iter().map(|v| v.join(DEVICE_HEX_NAME)).collect();

        let mut writer = ImageWriter::new().parallel(request.parallel);
        if let Some(dir) = &request.output_dir {
            writer = writer.with_local_copy(dir.join(format!("{}.hex", prepared.script_name)));
        }

        let written = writer.persist(prepared.image.as_str(), &destinations)?;
        info!(
            "flashed {} to {}/{} device(s)",
            prepared.script_name,
            written.succeeded(),
            destinations.len()
        );

        Ok(FlashReport {
            script_name: prepared.script_name,
            script_records: prepared.records.len(),
            image_lines: prepared.image.line_count(),
            local_copy: written.local_copy,
            devices: written.destinations,
            discovery_error,
        })
    }
}
