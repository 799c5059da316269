/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Process execution (the external svn client)
/// - File system operations (tree removal and copy)
/// - Client path syntax translation
pub mod filesystem;
pub mod path;
pub mod process;

// Re-export commonly used types
pub use filesystem::{FileSystem, LocalFileSystem};
pub use path::{PathMode, PathModeSetting};
pub use process::{CommandError, CommandOutput, CommandRunner, ProcessCommandRunner, StdioMode};
