//! Script framing.
//!
//! Responsibilities:
//! - Normalise line endings and run the optional minifier
//! - Wrap script bytes in the `MP` + length header
//! - Pad to the record size and enforce the script region ceiling
//!
//! Non-responsibilities:
//! - Record encoding
//! - IO

pub mod types;
pub mod minify;
pub mod encode;
pub mod decode;

pub use types::{Frame, FrameError};
pub use minify::Minifier;
pub use encode::{encode_frame, FrameBuilder};
pub use decode::decode_frame;
