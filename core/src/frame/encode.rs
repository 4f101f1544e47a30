use std::fmt;
use std::sync::Arc;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::constants::{FRAME_HEADER_LEN, MAX_FRAME_SIZE, RECORD_DATA_LEN, SCRIPT_MAGIC};
use crate::frame::minify::Minifier;
use crate::frame::types::{Frame, FrameError};
use crate::utils::normalize_line_endings;

/// Wrap script bytes into a frame.
///
/// Padding is `16 - len % 16` zero bytes, so an already aligned buffer still
/// gains a full block. This matches the images produced by existing tools.
///
/// The ceiling is checked after padding.
pub fn encode_frame(script: &[u8]) -> Result<Frame, FrameError> {
    let unpadded = FRAME_HEADER_LEN + script.len();
    let total = unpadded + (RECORD_DATA_LEN - unpadded % RECORD_DATA_LEN);
    if total > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadTooLarge { size: total, limit: MAX_FRAME_SIZE });
    }

    let mut out = Vec::with_capacity(total);

    // --- Header ---
    out.extend_from_slice(&SCRIPT_MAGIC);
    let mut len = [0u8; 2];
    // total <= MAX_FRAME_SIZE, so the script length fits in u16.
    LittleEndian::write_u16(&mut len, script.len() as u16);
    out.extend_from_slice(&len);

    // --- Body ---
    out.extend_from_slice(script);
    out.resize(total, 0);

    debug_assert_eq!(out.len() % RECORD_DATA_LEN, 0, "frame not record aligned");
    Ok(Frame::from_encoded(out))
}

/// Builds frames from raw scripts, optionally through a minifier.
#[derive(Clone, Default)]
pub struct FrameBuilder {
    minifier: Option<Arc<dyn Minifier>>,
}

impl FrameBuilder {
    /// Builder without minification support.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minifier<M: Minifier + 'static>(minifier: M) -> Self {
        Self { minifier: Some(Arc::new(minifier)) }
    }

    /// Whether `build(.., true)` can succeed.
    pub fn can_minify(&self) -> bool {
        self.minifier.is_some()
    }

    /// Frame a script.
    ///
    /// # Returns
    /// - `Ok(None)` for an empty script (nothing to embed).
    /// - `Ok(Some(frame))` otherwise.
    ///
    /// # Errors
    /// - `MinifierUnavailable` if `minify` is set without a minifier and the
    ///   script is not empty.
    /// - `InvalidUtf8` / `Minify` when minification cannot run.
    /// - `PayloadTooLarge` when the padded frame exceeds the script region.
    pub fn build(&self, script: &[u8], minify: bool) -> Result<Option<Frame>, FrameError> {
        if script.is_empty() {
            return Ok(None);
        }

        let minifier = match (minify, &self.minifier) {
            (true, None) => return Err(FrameError::MinifierUnavailable),
            (true, Some(m)) => Some(m),
            (false, _) => None,
        };

        let mut script = normalize_line_endings(script);

        if let Some(m) = minifier {
            let text = std::str::from_utf8(&script)
                .map_err(|e| FrameError::InvalidUtf8 { valid_up_to: e.valid_up_to() })?;
            let mangled = m
                .mangle(text)
                .map_err(|reason| FrameError::Minify { minifier: m.name(), reason })?;
            debug!("minifier {} shrank script {} -> {} bytes", m.name(), script.len(), mangled.len());
            script = mangled.into_bytes();
        }

        let frame = encode_frame(&script)?;
        debug!("framed {} script bytes into {} bytes", script.len(), frame.len());
        Ok(Some(frame))
    }
}

impl fmt::Debug for FrameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuilder")
            .field("minifier", &self.minifier.as_ref().map(|m| m.name()))
            .finish()
    }
}
