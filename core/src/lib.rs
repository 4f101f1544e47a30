//! mpflash-core
//!
//! Packs MicroPython scripts into Intel-HEX records and splices them into a
//! runtime firmware image. No CLI, no argument parsing.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Pipeline stages
pub mod frame;
pub mod records;
pub mod splice;
pub mod writer;
pub mod volumes;

// Orchestration
pub mod flash;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::flash::{FlashReport, FlashRequest, Flasher, RuntimeSource, ScriptSource};
    pub use crate::frame::{Frame, FrameBuilder, FrameError, Minifier};
    pub use crate::records::{encode_records, extract_script, hexlify, Record, RecordStream};
    pub use crate::splice::{embed_hex, splice, CompositeImage, RuntimeImage};
    pub use crate::types::FlashError;
    pub use crate::volumes::{default_locator, VolumeLocator};
    pub use crate::writer::{save_hex, ImageWriter};
}
