use log::debug;

use crate::constants::{RECORD_DATA_LEN, SCRIPT_ADDR};
use crate::frame::{Frame, FrameBuilder, FrameError};
use crate::records::types::{Record, RecordStream};

/// Encode a frame as records placed at `SCRIPT_ADDR`.
///
/// Layout:
///
/// ```text
/// :020000040003F7          extended linear address (SCRIPT_ADDR >> 16)
/// :10E000004D50....        16 data bytes at 0xE000
/// :10E01000........        +16 per record
/// ```
pub fn encode_records(frame: &Frame) -> RecordStream {
    let mut records = Vec::with_capacity(1 + frame.len() / RECORD_DATA_LEN);
    records.push(Record::extended_linear_address((SCRIPT_ADDR >> 16) as u16));

    let mut addr = SCRIPT_ADDR;
    for chunk in frame.as_bytes().chunks(RECORD_DATA_LEN) {
        debug_assert_eq!(chunk.len(), RECORD_DATA_LEN, "frame not record aligned");
        records.push(Record::data_chunk((addr & 0xFFFF) as u16, chunk));
        // Step is fixed; chunk length only affects the byte count.
        addr += RECORD_DATA_LEN as u32;
    }

    debug!("encoded {} byte frame into {} records", frame.len(), records.len());
    RecordStream::from_records(records)
}

/// Script bytes → record lines.
///
/// Returns an empty string for an empty script.
pub fn hexlify(script: &[u8], builder: &FrameBuilder, minify: bool) -> Result<String, FrameError> {
    Ok(script_records(script, builder, minify)?.to_text())
}

/// Script bytes → record stream (empty for an empty script).
pub fn script_records(
    script: &[u8],
    builder: &FrameBuilder,
    minify: bool,
) -> Result<RecordStream, FrameError> {
    match builder.build(script, minify)? {
        Some(frame) => Ok(encode_records(&frame)),
        None => Ok(RecordStream::new()),
    }
}
