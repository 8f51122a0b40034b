use std::sync::Arc;

use crate::storage::Storage;
use crate::types::{TrackerError, User, UserPatch, ValidationError};

/// CRUD façade for users. All input validation happens here, before any
/// statement reaches the storage layer.
pub struct UserRepository {
    store: Arc<dyn Storage + Send + Sync>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn Storage + Send + Sync>) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str, age: i64, email: &str) -> Result<User, TrackerError> {
        validate_name(name)?;
        validate_age(age)?;
        validate_email(email)?;
        self.store
            .insert_user(name.trim(), age, email)
            .map_err(|err| map_duplicate_email(err, email))
    }

    pub fn get_all(&self) -> Result<Vec<User>, TrackerError> {
        self.store.list_users()
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>, TrackerError> {
        self.store.load_user(id)
    }

    pub fn find_by_name(&self, needle: &str) -> Result<Vec<User>, TrackerError> {
        self.store.find_users_by_name(needle)
    }

    pub fn update(&self, id: i64, patch: &UserPatch) -> Result<User, TrackerError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(age) = patch.age {
            validate_age(age)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        let rows = self.store.update_user(id, patch).map_err(|err| {
            match patch.email.as_deref() {
                Some(email) => map_duplicate_email(err, email),
                None => err,
            }
        })?;
        if rows == 0 {
            return Err(TrackerError::UserNotFound(id));
        }
        self.store
            .load_user(id)?
            .ok_or(TrackerError::UserNotFound(id))
    }

    /// Removes the user and every glucose entry they own. Deleting an
    /// unknown id fails with `UserNotFound`.
    pub fn delete(&self, id: i64) -> Result<(), TrackerError> {
        let rows = self.store.delete_user_with_entries(id)?;
        if rows == 0 {
            return Err(TrackerError::UserNotFound(id));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(ValidationError::InvalidName);
    }
    let alphabetic_words = name
        .split_whitespace()
        .all(|word| word.chars().all(char::is_alphabetic));
    if !alphabetic_words {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

fn validate_age(age: i64) -> Result<(), ValidationError> {
    if age <= 0 {
        return Err(ValidationError::InvalidAge);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email.contains('@') || !email.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn map_duplicate_email(err: TrackerError, email: &str) -> TrackerError {
    if is_unique_email_violation(&err) {
        return TrackerError::DuplicateEmail(email.to_string());
    }
    err
}

fn is_unique_email_violation(err: &TrackerError) -> bool {
    matches!(
        err,
        TrackerError::Query(rusqlite::Error::SqliteFailure(failure, Some(message)))
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
                && message.contains("users.email")
    )
}
