use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;

use super::traits::{StorageRead, StorageWrite};
use crate::types::{EntryPatch, GlucoseEntry, TrackerError, User, UserPatch};

const DB_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    email TEXT NOT NULL UNIQUE
);
CREATE TABLE glucose_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    value_mmol REAL NOT NULL,
    timestamp TEXT NOT NULL,
    notes TEXT,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
CREATE INDEX glucose_entries_user_idx ON glucose_entries(user_id);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        email: row.get(3)?,
    })
}

fn map_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GlucoseEntry> {
    Ok(GlucoseEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        value_mmol: row.get(2)?,
        timestamp: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn db_load_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, age, email FROM users WHERE id = ?1",
        params![id],
        map_user_row,
    )
    .optional()
}

fn db_list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, age, email FROM users ORDER BY id")?;
    let mapped = stmt
        .query_map([], map_user_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_find_users_by_name(conn: &Connection, needle: &str) -> rusqlite::Result<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, name, age, email FROM users WHERE name LIKE ?1 ORDER BY id")?;
    let mapped = stmt
        .query_map(params![format!("%{needle}%")], map_user_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_insert_user(conn: &Connection, name: &str, age: i64, email: &str) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO users (name, age, email) VALUES (?1, ?2, ?3)",
        params![name, age, email],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        age,
        email: email.to_string(),
    })
}

fn db_update_user(conn: &Connection, id: i64, patch: &UserPatch) -> rusqlite::Result<usize> {
    let mut assignments = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(name) = &patch.name {
        assignments.push("name = ?");
        values.push(Box::new(name.clone()));
    }
    if let Some(age) = patch.age {
        assignments.push("age = ?");
        values.push(Box::new(age));
    }
    if let Some(email) = &patch.email {
        assignments.push("email = ?");
        values.push(Box::new(email.clone()));
    }
    values.push(Box::new(id));

    let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));
    conn.execute(
        &sql,
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
    )
}

fn db_delete_user_with_entries(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("BEGIN IMMEDIATE", [])?;
    let deleted = (|| {
        conn.execute(
            "DELETE FROM glucose_entries WHERE user_id = ?1",
            params![id],
        )?;
        conn.execute("DELETE FROM users WHERE id = ?1", params![id])
    })();
    match deleted {
        Ok(rows) => {
            conn.execute("COMMIT", [])?;
            Ok(rows)
        }
        Err(err) => {
            let _ = conn.execute("ROLLBACK", []);
            Err(err)
        }
    }
}

fn db_load_entry(conn: &Connection, id: i64) -> rusqlite::Result<Option<GlucoseEntry>> {
    conn.query_row(
        "SELECT id, user_id, value_mmol, timestamp, notes FROM glucose_entries WHERE id = ?1",
        params![id],
        map_entry_row,
    )
    .optional()
}

fn db_list_entries(conn: &Connection) -> rusqlite::Result<Vec<GlucoseEntry>> {
    let mut stmt = conn
        .prepare("SELECT id, user_id, value_mmol, timestamp, notes FROM glucose_entries ORDER BY id")?;
    let mapped = stmt
        .query_map([], map_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_list_entries_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<GlucoseEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, value_mmol, timestamp, notes FROM glucose_entries WHERE user_id = ?1 ORDER BY id",
    )?;
    let mapped = stmt
        .query_map(params![user_id], map_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_find_entries_by_value(
    conn: &Connection,
    value_mmol: f64,
) -> rusqlite::Result<Vec<GlucoseEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, value_mmol, timestamp, notes FROM glucose_entries WHERE value_mmol = ?1 ORDER BY id",
    )?;
    let mapped = stmt
        .query_map(params![value_mmol], map_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_insert_entry(
    conn: &Connection,
    user_id: i64,
    value_mmol: f64,
    timestamp: &str,
    notes: Option<&str>,
) -> rusqlite::Result<GlucoseEntry> {
    conn.execute(
        "INSERT INTO glucose_entries (user_id, value_mmol, timestamp, notes) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, value_mmol, timestamp, notes],
    )?;
    Ok(GlucoseEntry {
        id: conn.last_insert_rowid(),
        user_id,
        value_mmol,
        timestamp: timestamp.to_string(),
        notes: notes.map(str::to_string),
    })
}

fn db_update_entry(conn: &Connection, id: i64, patch: &EntryPatch) -> rusqlite::Result<usize> {
    let mut assignments = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(value_mmol) = patch.value_mmol {
        assignments.push("value_mmol = ?");
        values.push(Box::new(value_mmol));
    }
    if let Some(notes) = &patch.notes {
        assignments.push("notes = ?");
        values.push(Box::new(notes.clone()));
    }
    values.push(Box::new(id));

    let sql = format!(
        "UPDATE glucose_entries SET {} WHERE id = ?",
        assignments.join(", ")
    );
    conn.execute(
        &sql,
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
    )
}

fn db_delete_entry(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM glucose_entries WHERE id = ?1", params![id])
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<(), TrackerError> {
        if !Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path).map_err(TrackerError::StorageUnavailable)?;
        Ok(())
    }

    pub fn init(&self) -> Result<(), TrackerError> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, TrackerError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        Ok(f(&conn)?)
    }

    fn migrate(conn: &Connection) -> Result<(), TrackerError> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!("SQLite schema migration: 0 -> {}", DB_SCHEMA_VERSION);
            conn.execute_batch(SCHEMA)?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(TrackerError::Schema(format!(
            "database schema version mismatch: found {version}, expected {DB_SCHEMA_VERSION}; run with --reset to start over"
        )))
    }
}

impl StorageRead for SqliteStorage {
    fn load_user(&self, id: i64) -> Result<Option<User>, TrackerError> {
        self.with_conn(|conn| db_load_user(conn, id))
    }

    fn list_users(&self) -> Result<Vec<User>, TrackerError> {
        self.with_conn(db_list_users)
    }

    fn find_users_by_name(&self, needle: &str) -> Result<Vec<User>, TrackerError> {
        self.with_conn(|conn| db_find_users_by_name(conn, needle))
    }

    fn load_entry(&self, id: i64) -> Result<Option<GlucoseEntry>, TrackerError> {
        self.with_conn(|conn| db_load_entry(conn, id))
    }

    fn list_entries(&self) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.with_conn(db_list_entries)
    }

    fn list_entries_for_user(&self, user_id: i64) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.with_conn(|conn| db_list_entries_for_user(conn, user_id))
    }

    fn find_entries_by_value(&self, value_mmol: f64) -> Result<Vec<GlucoseEntry>, TrackerError> {
        self.with_conn(|conn| db_find_entries_by_value(conn, value_mmol))
    }
}

impl StorageWrite for SqliteStorage {
    fn insert_user(&self, name: &str, age: i64, email: &str) -> Result<User, TrackerError> {
        self.with_conn(|conn| db_insert_user(conn, name, age, email))
    }

    fn update_user(&self, id: i64, patch: &UserPatch) -> Result<usize, TrackerError> {
        self.with_conn(|conn| db_update_user(conn, id, patch))
    }

    fn delete_user_with_entries(&self, id: i64) -> Result<usize, TrackerError> {
        self.with_conn(|conn| db_delete_user_with_entries(conn, id))
    }

    fn insert_entry(
        &self,
        user_id: i64,
        value_mmol: f64,
        timestamp: &str,
        notes: Option<&str>,
    ) -> Result<GlucoseEntry, TrackerError> {
        self.with_conn(|conn| db_insert_entry(conn, user_id, value_mmol, timestamp, notes))
    }

    fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<usize, TrackerError> {
        self.with_conn(|conn| db_update_entry(conn, id, patch))
    }

    fn delete_entry(&self, id: i64) -> Result<usize, TrackerError> {
        self.with_conn(|conn| db_delete_entry(conn, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("{}_{}.{}", prefix, nanos, ext));
        p
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let path = unique_temp_file("glucolog_reset", "db");
        let store = SqliteStorage::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let path = unique_temp_file("glucolog_reset", "db");
        std::fs::write(&path, b"dummy").unwrap();
        assert!(path.exists());
        let store = SqliteStorage::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_initializes_schema() {
        let path = unique_temp_file("glucolog_init", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        assert!(path.exists());

        let conn = Connection::open(&path).unwrap();
        let users: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('users', 'glucose_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(users, 2);

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_init_is_idempotent() {
        let path = unique_temp_file("glucolog_init_twice", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();
        store.init().unwrap();
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let path = unique_temp_file("glucolog_bad_version", "db");
        let store = SqliteStorage::new(&path);

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = store
            .init()
            .expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn sqlite_insert_and_list_users_in_insertion_order() {
        let path = unique_temp_file("glucolog_users", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let alice = store.insert_user("Alice Smith", 34, "alice@example.com").unwrap();
        let bob = store.insert_user("Bob Jones", 51, "bob@example.com").unwrap();
        assert!(bob.id > alice.id);

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], alice);
        assert_eq!(users[1], bob);

        assert_eq!(store.load_user(alice.id).unwrap(), Some(alice));
        assert_eq!(store.load_user(999).unwrap(), None);
    }

    #[test]
    fn sqlite_rejects_duplicate_email_via_unique_constraint() {
        let path = unique_temp_file("glucolog_dup_email", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        store.insert_user("Alice Smith", 34, "same@example.com").unwrap();
        let err = store
            .insert_user("Bob Jones", 51, "same@example.com")
            .expect_err("duplicate email should fail");
        match err {
            TrackerError::Query(rusqlite::Error::SqliteFailure(failure, Some(message))) => {
                assert_eq!(failure.code, rusqlite::ErrorCode::ConstraintViolation);
                assert!(message.contains("users.email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn sqlite_find_users_by_name_matches_substring() {
        let path = unique_temp_file("glucolog_find_name", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        store.insert_user("John Doe", 33, "john@example.com").unwrap();
        store.insert_user("Alice Smith", 40, "alice@example.com").unwrap();

        let does = store.find_users_by_name("doe").unwrap();
        assert_eq!(does.len(), 2);
        let nobody = store.find_users_by_name("zzz").unwrap();
        assert!(nobody.is_empty());
    }

    #[test]
    fn sqlite_update_user_patches_only_given_fields() {
        let path = unique_temp_file("glucolog_update_user", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let user = store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        let patch = UserPatch {
            age: Some(31),
            ..UserPatch::default()
        };
        assert_eq!(store.update_user(user.id, &patch).unwrap(), 1);

        let reloaded = store.load_user(user.id).unwrap().unwrap();
        assert_eq!(reloaded.age, 31);
        assert_eq!(reloaded.name, "Jane Doe");
        assert_eq!(reloaded.email, "jane@example.com");

        assert_eq!(store.update_user(999, &patch).unwrap(), 0);
    }

    #[test]
    fn sqlite_entries_round_trip_and_filter_by_user() {
        let path = unique_temp_file("glucolog_entries", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let user = store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        let other = store.insert_user("John Doe", 33, "john@example.com").unwrap();

        let first = store
            .insert_entry(user.id, 5.6, "2026-08-08T07:00:00Z", Some("fasting"))
            .unwrap();
        store
            .insert_entry(user.id, 7.1, "2026-08-08T12:30:00Z", None)
            .unwrap();
        store
            .insert_entry(other.id, 4.9, "2026-08-08T08:00:00Z", None)
            .unwrap();

        assert_eq!(store.list_entries().unwrap().len(), 3);

        let owned = store.list_entries_for_user(user.id).unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0], first);

        let found = store.find_entries_by_value(5.6).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first.id);

        assert_eq!(store.load_entry(first.id).unwrap(), Some(first));
        assert_eq!(store.load_entry(999).unwrap(), None);
    }

    #[test]
    fn sqlite_update_entry_keeps_timestamp_and_user() {
        let path = unique_temp_file("glucolog_update_entry", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let user = store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        let entry = store
            .insert_entry(user.id, 5.6, "2026-08-08T07:00:00Z", Some("fasting"))
            .unwrap();

        let patch = EntryPatch {
            notes: Some("post lunch".to_string()),
            ..EntryPatch::default()
        };
        assert_eq!(store.update_entry(entry.id, &patch).unwrap(), 1);

        let reloaded = store.load_entry(entry.id).unwrap().unwrap();
        assert_eq!(reloaded.notes.as_deref(), Some("post lunch"));
        assert_eq!(reloaded.value_mmol, 5.6);
        assert_eq!(reloaded.timestamp, entry.timestamp);
        assert_eq!(reloaded.user_id, user.id);
    }

    #[test]
    fn sqlite_delete_entry_reports_removed_rows() {
        let path = unique_temp_file("glucolog_delete_entry", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let user = store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        let entry = store
            .insert_entry(user.id, 5.6, "2026-08-08T07:00:00Z", None)
            .unwrap();

        assert_eq!(store.delete_entry(entry.id).unwrap(), 1);
        assert_eq!(store.delete_entry(entry.id).unwrap(), 0);
    }

    #[test]
    fn sqlite_delete_user_with_entries_leaves_no_orphans() {
        let path = unique_temp_file("glucolog_cascade", "db");
        let store = SqliteStorage::new(&path);
        store.init().unwrap();

        let user = store.insert_user("Jane Doe", 30, "jane@example.com").unwrap();
        let kept = store.insert_user("John Doe", 33, "john@example.com").unwrap();
        store
            .insert_entry(user.id, 5.6, "2026-08-08T07:00:00Z", None)
            .unwrap();
        store
            .insert_entry(user.id, 7.1, "2026-08-08T12:30:00Z", None)
            .unwrap();
        store
            .insert_entry(kept.id, 4.9, "2026-08-08T08:00:00Z", None)
            .unwrap();

        assert_eq!(store.delete_user_with_entries(user.id).unwrap(), 1);

        assert_eq!(store.load_user(user.id).unwrap(), None);
        assert!(store.list_entries_for_user(user.id).unwrap().is_empty());
        // The other user and their entries are untouched.
        assert_eq!(store.list_entries_for_user(kept.id).unwrap().len(), 1);

        assert_eq!(store.delete_user_with_entries(user.id).unwrap(), 0);
    }
}
