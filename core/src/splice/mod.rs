//! Runtime image splicing.
//!
//! Composite layout:
//!
//! ```text
//! runtime[..len - 5]
//! script records
//! runtime[len - 5..]      trailer, identity and order preserved
//! ```

pub mod types;
pub mod embed;

pub use types::{CompositeImage, RuntimeImage, SpliceError};
pub use embed::{embed_hex, splice};
