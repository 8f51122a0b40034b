mod wiring;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};

use crate::repo::{GlucoseRepository, UserRepository};
use crate::{cli, context, storage};

pub struct App {
    pub ctx: context::Context,
    pub storage: Arc<dyn storage::Storage + Send + Sync>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.config.log_file.as_deref().map(Path::new));
        log::info!("🚀 Starting glucolog");
        log::info!("📂 Data dir: {}", ctx.config.data_dir);
        if let Some(path) = ctx.config.log_file.as_deref() {
            log::info!("📝 Log file: {path}");
        }

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;

        Ok((Self { ctx, storage }, cli))
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.storage.clone())
    }

    pub fn glucose(&self) -> GlucoseRepository {
        GlucoseRepository::new(self.storage.clone())
    }
}
