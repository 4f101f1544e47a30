//! constants.rs
//! Flash layout and hex format constants shared by every pipeline stage.
//!
//! Design notes:
//! - The script region starts at `SCRIPT_ADDR` and is `MAX_FRAME_SIZE` bytes long.
//!   Together they keep every record address inside one 64 KiB page, so a
//!   single extended linear address record is enough.
//! - Changing either value breaks compatibility with the MicroPython runtime.

/// Start address of the script region in device flash.
pub const SCRIPT_ADDR: u32 = 0x3e000;

/// Largest frame (header + script + padding) the script region can hold.
pub const MAX_FRAME_SIZE: usize = 8188;

/// Frame signature the runtime looks for at `SCRIPT_ADDR`.
// [u8; 2] so the type itself enforces "exactly 2 bytes".
pub const SCRIPT_MAGIC: [u8; 2] = *b"MP";

/// Signature + little-endian u16 length.
pub const FRAME_HEADER_LEN: usize = 4;

/// Frames are padded to this alignment and split into records of this size.
pub const RECORD_DATA_LEN: usize = 16;

/// Number of records at the end of a runtime image that must stay last.
///
/// The MicroPython runtime hex ends with its start-address, UICR and
/// end-of-file records. Script records are inserted in front of them; moving
/// this offset produces images the device bootloader rejects.
pub const TRAILER_RECORDS: usize = 5;

/// Extension every written image must carry.
pub const HEX_EXTENSION: &str = "hex";

/// Extension of script files accepted from disk.
pub const SCRIPT_EXTENSION: &str = "py";

/// File name written to the root of each device volume.
pub const DEVICE_HEX_NAME: &str = "micropython.hex";

/// Volume label of a mounted micro:bit.
pub const VOLUME_LABEL: &str = "MICROBIT";

/// Directory that receives the local copy of every composite image.
pub const DEFAULT_OUTPUT_DIR: &str = "microbit";

/// Local copy name used when the script did not come from a file.
pub const DEFAULT_SCRIPT_NAME: &str = "my_hex";

/// Version reported by the bundled MicroPython in `os.uname()`.
pub const MICROPYTHON_VERSION: &str = "1.0.1";
