//! Replication state elements
//!
//! Items defined in this module *may* change between releases without notice.

mod error;
mod partner;

pub use self::error::*;
pub use self::partner::*;
