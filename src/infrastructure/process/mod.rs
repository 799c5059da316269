pub mod command_runner;

pub use command_runner::{
    render_command,
    CommandError,
    CommandOutput,
    CommandRunner,
    ProcessCommandRunner,
    StdioMode,
};
