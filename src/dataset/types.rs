use chrono::NaiveDateTime;
use serde::Serialize;

/// Columns every uploaded export must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "timestamp", "username", "comment"];

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: String,
    /// Wall-clock time as written in the file, offset dropped
    pub timestamp: NaiveDateTime,
    pub username: String,
    pub comment: String,
    /// Every cell of the source row, aligned with `Dataset::columns`
    #[serde(skip)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header row in input order, required and extra columns alike
    pub columns: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
