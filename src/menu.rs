use anyhow::Result;
use dialoguer::{Input, Select};

use crate::app::App;
use crate::types::{EntryPatch, TrackerError};

/// Interactive select loop. A failed action prints its error and returns to
/// the menu; only "Exit" ends the loop.
pub fn run(app: &App) -> Result<()> {
    loop {
        let items = vec![
            "Create user",
            "View all users",
            "Add glucose entry",
            "View glucose entries for a user",
            "Delete user",
            "Edit glucose entry",
            "Exit",
        ];
        let selection = Select::new()
            .with_prompt("=== Blood Glucose Tracker ===")
            .items(&items)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => create_user(app),
            1 => list_users(app),
            2 => add_entry(app),
            3 => list_entries(app),
            4 => delete_user(app),
            5 => edit_entry(app),
            _ => break,
        };
        if let Err(err) = outcome {
            println!("{err:#}");
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn create_user(app: &App) -> Result<()> {
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    let age: i64 = Input::new().with_prompt("Age").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;

    let user = app.users().create(name.trim(), age, &email)?;
    println!("Created: {} | {} | {}", user.id, user.name, user.email);
    Ok(())
}

fn list_users(app: &App) -> Result<()> {
    let users = app.users().get_all()?;
    if users.is_empty() {
        println!("No users found.");
    }
    for user in users {
        println!("{} | {} | {} | {}", user.id, user.name, user.age, user.email);
    }
    Ok(())
}

fn add_entry(app: &App) -> Result<()> {
    let user_id: i64 = Input::new().with_prompt("User ID").interact_text()?;
    let value: f64 = Input::new()
        .with_prompt("Glucose value (mmol/L)")
        .interact_text()?;
    let notes: String = Input::new()
        .with_prompt("Notes (optional)")
        .allow_empty(true)
        .interact_text()?;
    let notes = (!notes.is_empty()).then_some(notes);

    let entry = app.glucose().create(user_id, value, notes.as_deref())?;
    println!(
        "Added: {} | {} mmol/L | {}",
        entry.id, entry.value_mmol, entry.timestamp
    );
    Ok(())
}

fn list_entries(app: &App) -> Result<()> {
    let user_id: i64 = Input::new().with_prompt("User ID").interact_text()?;
    if app.users().find_by_id(user_id)?.is_none() {
        println!("User not found.");
        return Ok(());
    }

    let entries = app.glucose().find_by_user(user_id)?;
    if entries.is_empty() {
        println!("No glucose entries found for this user.");
    }
    for entry in entries {
        println!(
            "{} | {} mmol/L | {} | {}",
            entry.id,
            entry.value_mmol,
            entry.timestamp,
            entry.notes.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn delete_user(app: &App) -> Result<()> {
    let user_id: i64 = Input::new().with_prompt("User ID to delete").interact_text()?;
    match app.users().delete(user_id) {
        Ok(()) => println!("User {user_id} and related entries deleted."),
        Err(TrackerError::UserNotFound(_)) => println!("User not found."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn edit_entry(app: &App) -> Result<()> {
    let entry_id: i64 = Input::new().with_prompt("Entry ID to edit").interact_text()?;
    let Some(entry) = app.glucose().find_by_id(entry_id)? else {
        println!("Entry not found.");
        return Ok(());
    };

    // Empty input keeps the stored value.
    let value: String = Input::new()
        .with_prompt(format!("Value [{}]", entry.value_mmol))
        .allow_empty(true)
        .interact_text()?;
    let notes: String = Input::new()
        .with_prompt(format!("Notes [{}]", entry.notes.as_deref().unwrap_or("")))
        .allow_empty(true)
        .interact_text()?;

    let patch = EntryPatch {
        value_mmol: if value.is_empty() {
            None
        } else {
            Some(value.parse()?)
        },
        notes: (!notes.is_empty()).then_some(notes),
    };
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let updated = app.glucose().update(entry_id, &patch)?;
    println!(
        "Updated: {} | {} mmol/L | {}",
        updated.id,
        updated.value_mmol,
        updated.notes.as_deref().unwrap_or("")
    );
    Ok(())
}
