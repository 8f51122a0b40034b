use crate::app::App;
use crate::cli::Command;

pub mod glucose;
pub mod user;

pub trait CommandRunner {
    fn run(&self, app: &App) -> anyhow::Result<()>;
}

impl Command {
    pub fn run(&self, app: &App) -> anyhow::Result<()> {
        match self {
            Command::User { cmd } => cmd.run(app),
            Command::Glucose { cmd } => cmd.run(app),
            Command::Menu => crate::menu::run(app),
        }
    }
}
