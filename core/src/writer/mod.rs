//! Image persistence.
//!
//! Responsibilities:
//! - Reject empty images and non-`.hex` destinations
//! - Write the same bytes to every destination independently
//! - Keep a local copy even when no device is attached
//!
//! Non-responsibilities:
//! - Finding device volumes (see `volumes`)

pub mod types;
pub mod save;

pub use types::{DestinationOutcome, WriteError, WriteReport};
pub use save::{save_hex, ImageWriter};
