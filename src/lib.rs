pub mod cli;
pub mod http;
pub mod load_config;
pub mod prompt;

pub use cli::{run, Cli, Commands};
