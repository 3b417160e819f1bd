//! One module per subcommand. Each exposes `execute`.

pub mod apply;
pub mod completions;
pub mod config;
pub mod init;
pub mod markers;
