use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum UserCmd {
    #[command(about = "Create a new user")]
    Create {
        #[arg(long, value_name = "NAME", help = "Full name, letters and spaces only")]
        name: String,
        #[arg(long, value_name = "AGE", help = "Age in years, must be positive")]
        age: i64,
        #[arg(long, value_name = "EMAIL", help = "Email address, unique across users")]
        email: String,
    },
    #[command(about = "List all users")]
    List {
        #[arg(long, default_value_t = false, help = "Print as JSON")]
        json: bool,
    },
    #[command(about = "Update fields of an existing user")]
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        #[arg(long, value_name = "AGE")]
        age: Option<i64>,
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
    },
    #[command(about = "Delete a user and all their glucose entries")]
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
    #[command(about = "Find users whose name contains NAME")]
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },
}
