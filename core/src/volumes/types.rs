use std::fmt;
use std::io;
use std::path::PathBuf;

/// Finds mounted device volumes to flash.
pub trait VolumeLocator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Mount points of attached devices; empty when none are attached.
    fn locate(&self) -> Result<Vec<PathBuf>, LocateError>;
}

/// Caller-supplied volume list.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator(pub Vec<PathBuf>);

impl VolumeLocator for FixedLocator {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn locate(&self) -> Result<Vec<PathBuf>, LocateError> {
        Ok(self.0.clone())
    }
}

/// Locator for hosts without a discovery strategy.
#[derive(Debug, Clone)]
pub struct UnsupportedLocator {
    pub os: &'static str,
}

impl UnsupportedLocator {
    pub fn current() -> Self {
        Self { os: std::env::consts::OS }
    }
}

impl VolumeLocator for UnsupportedLocator {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn locate(&self) -> Result<Vec<PathBuf>, LocateError> {
        Err(LocateError::UnsupportedPlatform { os: self.os.to_string() })
    }
}

#[derive(Debug)]
pub enum LocateError {
    /// No discovery strategy for this host.
    UnsupportedPlatform { os: String },

    /// The mount listing command could not be run.
    Spawn { command: &'static str, source: io::Error },

    /// The mount listing command exited unsuccessfully.
    CommandFailed { command: &'static str, status: Option<i32>, stderr: String },
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LocateError::*;
        match self {
            UnsupportedPlatform { os } =>
                write!(f, "OS \"{}\" not supported", os),
            Spawn { command, source } =>
                write!(f, "failed to run `{}`: {}", command, source),
            CommandFailed { command, status: Some(code), stderr } =>
                write!(f, "`{}` exited with status {}: {}", command, code, stderr.trim()),
            CommandFailed { command, status: None, stderr } =>
                write!(f, "`{}` terminated by signal: {}", command, stderr.trim()),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocateError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}
