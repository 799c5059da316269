pub mod check_client;
pub mod download;

pub use check_client::*;
pub use download::*;
