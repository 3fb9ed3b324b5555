use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::JournalConfig;
use super::entry::{LogEntry, Status, Summary, SummaryTemplate};

/// The record index persisted as `journal/index.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalIndex {
    /// Next id handed out; ids are shared across record kinds
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub summaries: Vec<Summary>,
    #[serde(default)]
    pub templates: Vec<SummaryTemplate>,
}

fn first_id() -> u64 {
    1
}

impl JournalIndex {
    pub fn new() -> Self {
        JournalIndex {
            next_id: first_id(),
            ..Default::default()
        }
    }

    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn log(&self, id: u64) -> Option<&LogEntry> {
        self.logs.iter().find(|l| l.id == id)
    }

    pub fn log_mut(&mut self, id: u64) -> Option<&mut LogEntry> {
        self.logs.iter_mut().find(|l| l.id == id)
    }

    pub fn summary(&self, id: u64) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.id == id)
    }

    pub fn summary_mut(&mut self, id: u64) -> Option<&mut Summary> {
        self.summaries.iter_mut().find(|s| s.id == id)
    }

    pub fn template(&self, id: u64) -> Option<&SummaryTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn template_mut(&mut self, id: u64) -> Option<&mut SummaryTemplate> {
        self.templates.iter_mut().find(|t| t.id == id)
    }

    /// Logs that have not been soft-deleted
    pub fn active_logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter().filter(|l| l.status == Status::Active)
    }

    pub fn active_summaries(&self) -> impl Iterator<Item = &Summary> {
        self.summaries.iter().filter(|s| s.status == Status::Active)
    }

    pub fn active_templates(&self) -> impl Iterator<Item = &SummaryTemplate> {
        self.templates.iter().filter(|t| t.status == Status::Active)
    }

    /// The active template marked as default, if any
    pub fn default_template(&self) -> Option<&SummaryTemplate> {
        self.active_templates().find(|t| t.is_default)
    }

    /// The most recently created active log other than `id`: the source
    /// for carrying unfinished tasks forward.
    pub fn previous_log(&self, id: u64) -> Option<&LogEntry> {
        self.active_logs()
            .filter(|l| l.id != id)
            .max_by_key(|l| (l.create_time, l.id))
    }
}

/// A fully loaded journal directory
#[derive(Debug)]
pub struct Journal {
    /// Directory containing `journal/`
    pub root: PathBuf,
    /// Path to the `journal/` directory
    pub journal_dir: PathBuf,
    /// Parsed journal.toml
    pub config: JournalConfig,
    /// Record metadata; content files are read on demand
    pub index: JournalIndex,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn log(id: u64, days_ago: i64, status: Status) -> LogEntry {
        let t = Utc::now() - Duration::days(days_ago);
        LogEntry {
            id,
            creator_id: 1,
            status,
            create_time: t,
            update_time: t,
            title: format!("log {}", id),
            content: String::new(),
        }
    }

    #[test]
    fn allocate_ids_monotonically() {
        let mut index = JournalIndex::new();
        assert_eq!(index.allocate_id(), 1);
        assert_eq!(index.allocate_id(), 2);
        assert_eq!(index.next_id, 3);
    }

    #[test]
    fn previous_log_is_newest_other_active() {
        let mut index = JournalIndex::new();
        index.logs = vec![
            log(1, 3, Status::Active),
            log(2, 1, Status::Deleted),
            log(3, 2, Status::Active),
            log(4, 0, Status::Active),
        ];
        assert_eq!(index.previous_log(4).map(|l| l.id), Some(3));
        assert_eq!(index.previous_log(3).map(|l| l.id), Some(4));
        index.logs.truncate(1);
        assert!(index.previous_log(1).is_none());
    }
}
