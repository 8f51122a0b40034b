use serde::Serialize;

/// One blood-glucose reading, owned by a user.
///
/// `timestamp` is an RFC 3339 instant assigned at creation; it is never
/// updated afterwards, and neither is `user_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlucoseEntry {
    pub id: i64,
    pub user_id: i64,
    pub value_mmol: f64,
    pub timestamp: String,
    pub notes: Option<String>,
}

/// Partial update for an entry row. Only the measured value and the notes
/// are editable.
#[derive(Clone, Debug, Default)]
pub struct EntryPatch {
    pub value_mmol: Option<f64>,
    pub notes: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.value_mmol.is_none() && self.notes.is_none()
    }
}
