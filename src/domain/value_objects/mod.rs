pub mod source_url;

pub use source_url::{SourceUrl, SourceUrlError};
