use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::storage::Storage;
use crate::types::{EntryPatch, GlucoseEntry, TrackerError, ValidationError};

/// CRUD façade for glucose entries. Entry creation verifies the owning user
/// exists; everything below the user reference is free-form.
pub struct GlucoseRepository {
    store: Arc<dyn Storage + Send + Sync>,
}

impl GlucoseRepository {
    pub fn new(store: Arc<dyn Storage + Send + Sync>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        user_id: i64,
        value_mmol: f64,
        notes: Option<&str>,
    ) -> Result<GlucoseEntry, TrackerError> {
        if self.store.load_user(user_id)?.is_none() {
            return Err(TrackerError::UserNotFound(user_id));
        }
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.store
            .insert_entry(user_id, value_mmol, &timestamp, notes)
    }

    pub fn get_all(&self) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.store.list_entries()
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<GlucoseEntry>, TrackerError> {
        self.store.load_entry(id)
    }

    pub fn find_by_user(&self, user_id: i64) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.store.list_entries_for_user(user_id)
    }

    pub fn find_by_value(&self, value_mmol: f64) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.store.find_entries_by_value(value_mmol)
    }

    pub fn update(&self, id: i64, patch: &EntryPatch) -> Result<GlucoseEntry, TrackerError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        let rows = self.store.update_entry(id, patch)?;
        if rows == 0 {
            return Err(TrackerError::EntryNotFound(id));
        }
        self.store
            .load_entry(id)?
            .ok_or(TrackerError::EntryNotFound(id))
    }

    /// Returns whether a row was removed. A miss is not an error.
    pub fn delete(&self, id: i64) -> Result<bool, TrackerError> {
        Ok(self.store.delete_entry(id)? > 0)
    }
}
