use std::fmt;

/// Runtime firmware image as hex text.
///
/// Opaque apart from its last `TRAILER_RECORDS` lines. The original text is
/// kept so an image without a script is returned byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeImage {
    text: String,
}

impl RuntimeImage {
    /// Rejects empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Result<Self, SpliceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SpliceError::MissingRuntimeImage);
        }
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Record lines, split on any whitespace.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Runtime image with script records inserted before its trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeImage {
    text: String,
}

impl CompositeImage {
    pub(crate) fn from_text(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn line_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CompositeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// No runtime image text was supplied.
    MissingRuntimeImage,
}

impl fmt::Display for SpliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceError::MissingRuntimeImage =>
                write!(f, "MicroPython runtime hex required"),
        }
    }
}

impl std::error::Error for SpliceError {}
