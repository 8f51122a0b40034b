use crate::types::{EntryPatch, GlucoseEntry, TrackerError, User, UserPatch};

pub trait StorageRead {
    fn load_user(&self, id: i64) -> Result<Option<User>, TrackerError>;
    fn list_users(&self) -> Result<Vec<User>, TrackerError>;
    fn find_users_by_name(&self, needle: &str) -> Result<Vec<User>, TrackerError>;
    fn load_entry(&self, id: i64) -> Result<Option<GlucoseEntry>, TrackerError>;
    fn list_entries(&self) -> Result<Vec<GlucoseEntry>, TrackerError>;
    fn list_entries_for_user(&self, user_id: i64) -> Result<Vec<GlucoseEntry>, TrackerError>;
    fn find_entries_by_value(&self, value_mmol: f64) -> Result<Vec<GlucoseEntry>, TrackerError>;
}

pub trait StorageWrite {
    fn insert_user(&self, name: &str, age: i64, email: &str) -> Result<User, TrackerError>;
    /// Returns the number of rows changed; zero means the id was absent.
    fn update_user(&self, id: i64, patch: &UserPatch) -> Result<usize, TrackerError>;
    /// Removes the user row and every entry owned by it in one transaction.
    /// Returns the number of user rows removed.
    fn delete_user_with_entries(&self, id: i64) -> Result<usize, TrackerError>;
    fn insert_entry(
        &self,
        user_id: i64,
        value_mmol: f64,
        timestamp: &str,
        notes: Option<&str>,
    ) -> Result<GlucoseEntry, TrackerError>;
    fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<usize, TrackerError>;
    fn delete_entry(&self, id: i64) -> Result<usize, TrackerError>;
}

pub trait Storage: StorageRead + StorageWrite {}

impl<T: StorageRead + StorageWrite> Storage for T {}
