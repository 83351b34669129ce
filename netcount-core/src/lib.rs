//! netcount core library
//!
//! Error handling and the captured [`Frame`] value shared by the other
//! netcount crates.

pub mod error;
pub mod packet;

pub use error::{Error, Result};
pub use packet::Frame;
