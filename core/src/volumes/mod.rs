//! Device volume discovery.
//!
//! The pipeline only needs a list of paths; how they are found depends on the
//! host and is chosen by the caller through `VolumeLocator`.

pub mod types;
pub mod mount;

pub use types::{FixedLocator, LocateError, UnsupportedLocator, VolumeLocator};
pub use mount::{parse_mount_table, MountTableLocator};

/// Best discovery strategy for the current host.
pub fn default_locator() -> Box<dyn VolumeLocator> {
    #[cfg(unix)]
    {
        Box::new(MountTableLocator::default())
    }
    #[cfg(not(unix))]
    {
        Box::new(UnsupportedLocator::current())
    }
}
