use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{FRAME_HEADER_LEN, SCRIPT_MAGIC};
use crate::frame::types::FrameError;

/// Recover the script bytes from a frame.
///
/// Trailing bytes after the declared length are padding and ignored.
pub fn decode_frame(wire: &[u8]) -> Result<&[u8], FrameError> {
    if wire.len() < FRAME_HEADER_LEN {
        return Err(FrameError::Truncated);
    }

    let signature = [wire[0], wire[1]];
    if signature != SCRIPT_MAGIC {
        return Err(FrameError::InvalidSignature(signature));
    }

    let declared = LittleEndian::read_u16(&wire[2..FRAME_HEADER_LEN]) as usize;
    let available = wire.len() - FRAME_HEADER_LEN;
    if declared > available {
        return Err(FrameError::LengthMismatch { declared, available });
    }

    Ok(&wire[FRAME_HEADER_LEN..FRAME_HEADER_LEN + declared])
}
