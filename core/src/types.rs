use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::frame::FrameError;
use crate::records::RecordError;
use crate::splice::SpliceError;
use crate::volumes::LocateError;
use crate::writer::WriteError;

/// Unified error covering every pipeline stage.
/// - `From<T>` impls enable `?` across framing, encoding, splicing and writing.
/// - Messages carry the limits and paths a caller needs to act.
#[derive(Debug, Error)]
pub enum FlashError {
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("splice error: {0}")]
    Splice(#[from] SpliceError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),

    #[error("device discovery error: {0}")]
    Locate(#[from] LocateError),

    /// Script files must carry the `.py` extension.
    #[error("python files must end in \".py\": {}", .path.display())]
    InvalidScriptPath { path: PathBuf },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
