use std::fmt;
use std::io;
use std::path::PathBuf;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

#[derive(Debug)]
pub enum WriteError {
    /// Composite image text is empty.
    EmptyImage,

    /// Image contains non-ASCII bytes; the format is ASCII only.
    NotAscii,

    /// Destination does not end in `.hex`. Nothing was written there.
    InvalidDestination { path: PathBuf },

    /// Filesystem failure for one destination.
    Io { path: PathBuf, source: io::Error },

    /// A parallel write thread panicked.
    WorkerPanicked,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WriteError::*;
        match self {
            EmptyImage =>
                write!(f, "cannot flash an empty .hex file"),
            NotAscii =>
                write!(f, "hex image contains non-ASCII bytes"),
            InvalidDestination { path } =>
                write!(f, "the path to flash must be for a .hex file: {}", path.display()),
            Io { path, source } =>
                write!(f, "I/O error writing {}: {}", path.display(), source),
            WorkerPanicked =>
                write!(f, "destination writer thread panicked"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result of writing the image to one destination.
#[derive(Debug)]
pub struct DestinationOutcome {
    pub path: PathBuf,
    /// Bytes written on success.
    pub result: Result<usize, WriteError>,
}

impl DestinationOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for DestinationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("DestinationOutcome", 3)?;
        st.serialize_field("path", &self.path)?;
        match &self.result {
            Ok(n) => {
                st.serialize_field("bytes_written", n)?;
                st.serialize_field("error", &None::<String>)?;
            }
            Err(e) => {
                st.serialize_field("bytes_written", &None::<usize>)?;
                st.serialize_field("error", &Some(e.to_string()))?;
            }
        }
        st.end()
    }
}

/// Everything `ImageWriter::persist` did.
#[derive(Debug, Default, Serialize)]
pub struct WriteReport {
    /// Local copy path and size, when one was configured.
    pub local_copy: Option<(PathBuf, usize)>,
    /// One entry per destination, in input order.
    pub destinations: Vec<DestinationOutcome>,
}

impl WriteReport {
    pub fn succeeded(&self) -> usize {
        self.destinations.iter().filter(|d| d.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DestinationOutcome> {
        self.destinations.iter().filter(|d| !d.is_ok())
    }
}
