use clap::Subcommand;

use crate::cli::glucose_cmd::GlucoseCmd;
use crate::cli::user_cmd::UserCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "User management commands",
        long_about = "Create, list, update, find and delete users. Deleting a user also \
                      removes every glucose entry they own."
    )]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    #[command(
        about = "Glucose reading commands",
        long_about = "Record, list, edit, find and delete blood-glucose readings tied to a user."
    )]
    Glucose {
        #[command(subcommand)]
        cmd: GlucoseCmd,
    },
    #[command(about = "Run the interactive menu")]
    Menu,
}
