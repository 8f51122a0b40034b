use super::CommandRunner;
use crate::app::App;
use crate::cli;
use crate::types::{User, UserPatch};
use anyhow::Result;

impl CommandRunner for cli::UserCmd {
    fn run(&self, app: &App) -> Result<()> {
        let users = app.users();
        match self {
            cli::UserCmd::Create { name, age, email } => {
                let user = users.create(name, *age, email)?;
                log::info!("✅ Created user {}", user.id);
                println!("{}", format_user(&user));
                Ok(())
            }
            cli::UserCmd::List { json } => {
                let all = users.get_all()?;
                print_users(&all, *json)
            }
            cli::UserCmd::Update {
                id,
                name,
                age,
                email,
            } => {
                let patch = UserPatch {
                    name: name.clone(),
                    age: *age,
                    email: email.clone(),
                };
                let user = users.update(*id, &patch)?;
                log::info!("✅ Updated user {}", user.id);
                println!("{}", format_user(&user));
                Ok(())
            }
            cli::UserCmd::Delete { id } => {
                users.delete(*id)?;
                log::info!("✅ Deleted user {id} and their glucose entries");
                Ok(())
            }
            cli::UserCmd::Find { name } => {
                let found = users.find_by_name(name)?;
                print_users(&found, false)
            }
        }
    }
}

fn format_user(user: &User) -> String {
    format!("{} | {} | {} | {}", user.id, user.name, user.age, user.email)
}

fn print_users(users: &[User], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(users)?);
        return Ok(());
    }
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }
    for user in users {
        println!("{}", format_user(user));
    }
    Ok(())
}
