use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum GlucoseCmd {
    #[command(about = "Record a glucose reading for a user")]
    Add {
        #[arg(value_name = "USER_ID")]
        user_id: i64,
        #[arg(long, value_name = "MMOL", help = "Measured concentration in mmol/L")]
        value: f64,
        #[arg(long, value_name = "TEXT", help = "Free-form notes")]
        notes: Option<String>,
    },
    #[command(about = "List glucose readings, optionally for one user")]
    List {
        #[arg(value_name = "USER_ID")]
        user_id: Option<i64>,
        #[arg(long, default_value_t = false, help = "Print as JSON")]
        json: bool,
    },
    #[command(about = "Update the value and/or notes of a reading")]
    Update {
        #[arg(value_name = "ENTRY_ID")]
        entry_id: i64,
        #[arg(long, value_name = "MMOL")]
        value: Option<f64>,
        #[arg(long, value_name = "TEXT")]
        notes: Option<String>,
    },
    #[command(about = "Delete a reading")]
    Delete {
        #[arg(value_name = "ENTRY_ID")]
        entry_id: i64,
    },
    #[command(about = "Find readings with an exact value")]
    Find {
        #[arg(value_name = "MMOL")]
        value: f64,
    },
}
