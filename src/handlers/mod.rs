pub mod feed_handlers;

pub use feed_handlers::{Command, CommandError, Flow, HELP, handle_command, parse_command, render};
