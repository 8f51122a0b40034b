mod args;
mod command;
mod glucose_cmd;
mod user_cmd;

pub use args::Cli;
pub use command::Command;
pub use glucose_cmd::GlucoseCmd;
pub use user_cmd::UserCmd;

pub use args::parse;
