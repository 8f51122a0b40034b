use super::CommandRunner;
use crate::app::App;
use crate::cli;
use crate::types::{EntryPatch, GlucoseEntry};
use anyhow::Result;

impl CommandRunner for cli::GlucoseCmd {
    fn run(&self, app: &App) -> Result<()> {
        let glucose = app.glucose();
        match self {
            cli::GlucoseCmd::Add {
                user_id,
                value,
                notes,
            } => {
                let entry = glucose.create(*user_id, *value, notes.as_deref())?;
                log::info!(
                    "✅ Recorded {} mmol/L for user {}",
                    entry.value_mmol,
                    entry.user_id
                );
                println!("{}", format_entry(&entry));
                Ok(())
            }
            cli::GlucoseCmd::List { user_id, json } => {
                let entries = match user_id {
                    Some(user_id) => glucose.find_by_user(*user_id)?,
                    None => glucose.get_all()?,
                };
                print_entries(&entries, *json)
            }
            cli::GlucoseCmd::Update {
                entry_id,
                value,
                notes,
            } => {
                let patch = EntryPatch {
                    value_mmol: *value,
                    notes: notes.clone(),
                };
                let entry = glucose.update(*entry_id, &patch)?;
                log::info!("✅ Updated entry {}", entry.id);
                println!("{}", format_entry(&entry));
                Ok(())
            }
            cli::GlucoseCmd::Delete { entry_id } => {
                if glucose.delete(*entry_id)? {
                    log::info!("✅ Deleted entry {entry_id}");
                } else {
                    println!("Entry {entry_id} not found.");
                }
                Ok(())
            }
            cli::GlucoseCmd::Find { value } => {
                let found = glucose.find_by_value(*value)?;
                print_entries(&found, false)
            }
        }
    }
}

fn format_entry(entry: &GlucoseEntry) -> String {
    format!(
        "{} | user {} | {} mmol/L | {} | {}",
        entry.id,
        entry.user_id,
        entry.value_mmol,
        entry.timestamp,
        entry.notes.as_deref().unwrap_or("-")
    )
}

fn print_entries(entries: &[GlucoseEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No glucose entries found.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}
