//! Intel-HEX record encoding.
//!
//! Responsibilities:
//! - Split a frame into 16-byte, address-tagged, checksummed records
//! - Render records as text lines
//! - Parse lines back and recover an embedded script
//!
//! Non-responsibilities:
//! - Framing
//! - Splicing into a runtime image

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{Record, RecordError, RecordStream, RecordType};
pub use encode::{encode_records, hexlify, script_records};
pub use decode::{decode_records, extract_script};
