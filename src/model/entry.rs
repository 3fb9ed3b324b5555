use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete flag shared by every record. Stored as `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    Deleted,
    Active,
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::Deleted => 0,
            Status::Active => 1,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Deleted),
            1 => Ok(Status::Active),
            other => Err(format!("invalid status {}", other)),
        }
    }
}

/// A dated work-log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub creator_id: u64,
    pub status: Status,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub title: String,
    /// Markdown body, stored beside the index rather than in it
    #[serde(skip)]
    pub content: String,
}

/// A generated (then hand-edited) weekly report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub id: u64,
    pub creator_id: u64,
    pub status: Status,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub title: String,
    /// Logs the summary was generated from
    #[serde(default)]
    pub log_ids: Vec<u64>,
    #[serde(skip)]
    pub content: String,
}

/// A report skeleton handed to the summarizer as its structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryTemplate {
    pub id: u64,
    pub creator_id: u64,
    pub status: Status,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(skip)]
    pub content: String,
}

/// Which document a text payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRef {
    Log(u64),
    Summary(u64),
    Template(u64),
}

impl DocumentRef {
    pub fn id(self) -> u64 {
        match self {
            DocumentRef::Log(id) | DocumentRef::Summary(id) | DocumentRef::Template(id) => id,
        }
    }

    /// Directory name under the journal root holding this kind's content
    pub fn dir_name(self) -> &'static str {
        match self {
            DocumentRef::Log(_) => "logs",
            DocumentRef::Summary(_) => "summaries",
            DocumentRef::Template(_) => "templates",
        }
    }

    /// Summaries refuse to save under a blank title
    pub fn requires_title(self) -> bool {
        matches!(self, DocumentRef::Summary(_))
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Log(id) => write!(f, "log {}", id),
            DocumentRef::Summary(id) => write!(f, "summary {}", id),
            DocumentRef::Template(id) => write!(f, "template {}", id),
        }
    }
}
