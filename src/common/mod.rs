//! Shared error and result types

pub mod error;
pub mod result;

pub use error::{ErrorKind, StageError};
pub use result::{IoResultExt, StageResult};
