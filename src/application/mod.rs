//! Application layer: staging orchestration and its configuration

pub mod source_retriever;
pub mod stage_config;

pub use source_retriever::{build_checkout_args, source_spec, SourceRetriever, DEFAULT_CLIENT};
pub use stage_config::StageConfig;
