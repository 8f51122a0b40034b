mod error;
mod glucose_entry;
mod user;

pub use error::{TrackerError, ValidationError};
pub use glucose_entry::{EntryPatch, GlucoseEntry};
pub use user::{User, UserPatch};
