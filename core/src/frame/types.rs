use std::fmt;
use byteorder::{ByteOrder, LittleEndian};

use crate::constants::FRAME_HEADER_LEN;
use crate::utils::fmt_bytes;

/// Length-prefixed, zero-padded script buffer.
///
/// Layout:
///
/// ```text
/// [ signature "MP" (2) ]
/// [ script_len u16 LE (2) ]
/// [ script (N) ]
/// [ zero padding (1..=16) ]
/// ```
///
/// Only `encode_frame` constructs one, so the length is always a multiple of
/// 16 and never above `MAX_FRAME_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: even an empty script yields a header and padding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn signature(&self) -> [u8; 2] {
        [self.bytes[0], self.bytes[1]]
    }

    /// Script length recorded in the header.
    pub fn declared_len(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[2..FRAME_HEADER_LEN])
    }

    pub fn payload(&self) -> &[u8] {
        let end = FRAME_HEADER_LEN + self.declared_len() as usize;
        &self.bytes[FRAME_HEADER_LEN..end]
    }

    pub fn padding_len(&self) -> usize {
        self.len() - FRAME_HEADER_LEN - self.declared_len() as usize
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Minification was requested but no minifier is installed.
    MinifierUnavailable,

    /// Minification needs text; the script is not valid UTF-8.
    InvalidUtf8 { valid_up_to: usize },

    /// The installed minifier rejected the script.
    Minify { minifier: &'static str, reason: String },

    /// Padded frame does not fit the script region.
    PayloadTooLarge { size: usize, limit: usize },

    /// Decoding: buffer does not start with `MP`.
    InvalidSignature([u8; 2]),

    /// Decoding: buffer shorter than the frame header.
    Truncated,

    /// Decoding: header declares more script bytes than are present.
    LengthMismatch { declared: usize, available: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FrameError::*;
        match self {
            MinifierUnavailable =>
                write!(f, "no minifier is available"),
            InvalidUtf8 { valid_up_to } =>
                write!(f, "script is not valid UTF-8 (valid up to byte {})", valid_up_to),
            Minify { minifier, reason } =>
                write!(f, "minifier {} failed: {}", minifier, reason),
            PayloadTooLarge { size, limit } =>
                write!(f, "python script must be less than {} bytes (framed size {})", limit, size),
            InvalidSignature(sig) =>
                write!(f, "invalid frame signature: {}", fmt_bytes(sig)),
            Truncated =>
                write!(f, "truncated frame"),
            LengthMismatch { declared, available } =>
                write!(f, "frame declares {} script bytes, only {} available", declared, available),
        }
    }
}

impl std::error::Error for FrameError {}
