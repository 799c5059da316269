//! # srcstage - Subversion source staging
//!
//! `srcstage` checks out a Subversion project at a pinned revision into a build
//! working directory and lays it out the way later pipeline stages expect:
//!
//! - `<working_dir>/source` holds the staged tree
//! - `<working_dir>/context-tmp` holds a full checkout while a context
//!   subdirectory is being promoted to `source`
//!
//! The version-control work itself is delegated to the external `svn` client.
//!
//! ## Quick Start
//!
//! ```bash
//! srcstage download \
//!     --working-dir /tmp/build \
//!     --source https://svn.example.org/proj/trunk \
//!     --revision 42 \
//!     --context-dir lib/foo
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: requests, the staged source record, and source locations
//! - [`application`]: the [`application::SourceRetriever`] orchestration and configuration
//! - [`infrastructure`]: process execution, filesystem helpers, client path translation
//! - [`presentation`]: CLI interface
//! - [`common`]: error and result types
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use srcstage::application::SourceRetriever;
//! use srcstage::domain::entities::RetrievalRequest;
//! use srcstage::domain::value_objects::SourceUrl;
//! use srcstage::infrastructure::{LocalFileSystem, ProcessCommandRunner};
//!
//! # async fn example() -> srcstage::Result<()> {
//! let source = SourceUrl::new("https://svn.example.org/proj/trunk").unwrap();
//! let request = RetrievalRequest::new("/tmp/build", source)
//!     .with_revision("42")
//!     .with_context_dir("lib/foo");
//!
//! let retriever = SourceRetriever::new(
//!     Arc::new(ProcessCommandRunner::new()),
//!     Arc::new(LocalFileSystem::new()),
//! );
//! let info = retriever.download(&request).await?;
//! println!("{} @ {}", info.location, info.revision);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - [`common::error::StageError`]: error type, classified by [`common::error::ErrorKind`]
//! - [`common::result::StageResult`]: Type alias for `Result<T, StageError>`

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::{ErrorKind, StageError};
pub use crate::common::result::StageResult as Result;
