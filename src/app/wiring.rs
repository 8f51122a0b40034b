use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};

use crate::context;
use crate::storage::{self, SqliteStorage};
use crate::types::TrackerError;

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    let data_dir = std::path::PathBuf::from(&ctx.config.data_dir);
    std::fs::create_dir_all(&data_dir)
        .map_err(TrackerError::StorageUnavailable)
        .context("creating data dir")?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<Arc<dyn storage::Storage + Send + Sync>> {
    let data_dir = std::path::PathBuf::from(&ctx.config.data_dir);
    let db_path = data_dir
        .join("glucolog.sqlite")
        .to_string_lossy()
        .into_owned();
    let sqlite = SqliteStorage::new(&db_path);
    if ctx.config.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(Arc::new(sqlite))
}
