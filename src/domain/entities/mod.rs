pub mod retrieval;

pub use retrieval::{
    Credentials, RetrievalRequest, SourceInfo, StagingLayout, CONTEXT_TMP_DIR_NAME,
    SOURCE_DIR_NAME,
};
