use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::lock::JournalLock;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::state::{self, UiState};
use crate::io::store::{DocumentStore, StoreError, StoredDocument};
use crate::model::entry::{DocumentRef, LogEntry, Status, Summary, SummaryTemplate};
use crate::model::journal::{Journal, JournalIndex};

/// Name of the journal directory under the journal root
pub const JOURNAL_DIR: &str = "journal";

const INDEX_FILE: &str = "index.json";

/// Find the journal root by walking up from `start`, looking for
/// `journal/journal.toml`.
pub fn discover_journal(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(JOURNAL_DIR).join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAJournal(start.to_path_buf()));
        }
    }
}

/// Create `journal/` under `root` with a default config and an empty index
pub fn init_journal(root: &Path, name: &str) -> Result<Journal, StoreError> {
    let journal_dir = root.join(JOURNAL_DIR);
    if journal_dir.join(CONFIG_FILE).exists() {
        return Err(StoreError::AlreadyExists(journal_dir));
    }
    for sub in ["logs", "summaries", "templates"] {
        let dir = journal_dir.join(sub);
        fs::create_dir_all(&dir).map_err(|source| StoreError::WriteError { path: dir, source })?;
    }

    let config_path = journal_dir.join(CONFIG_FILE);
    recovery::atomic_write(&config_path, config_io::default_config_text(name).as_bytes())
        .map_err(|source| StoreError::WriteError {
            path: config_path,
            source,
        })?;

    let journal = Journal {
        root: root.to_path_buf(),
        journal_dir,
        config: config_io::read_config(&root.join(JOURNAL_DIR))?.0,
        index: JournalIndex::new(),
    };
    journal.write_index()?;
    log::info!("initialized journal {:?} at {}", name, root.display());
    Ok(journal)
}

/// Load config and index of the journal rooted at `root`
pub fn load_journal(root: &Path) -> Result<Journal, StoreError> {
    let journal_dir = root.join(JOURNAL_DIR);
    if !journal_dir.join(CONFIG_FILE).is_file() {
        return Err(StoreError::NotAJournal(root.to_path_buf()));
    }
    let (config, _) = config_io::read_config(&journal_dir)?;
    let index = read_index(&journal_dir)?;

    Ok(Journal {
        root: root.to_path_buf(),
        journal_dir,
        config,
        index,
    })
}

fn read_index(journal_dir: &Path) -> Result<JournalIndex, StoreError> {
    let path = journal_dir.join(INDEX_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(JournalIndex::new()),
        Err(source) => Err(StoreError::ReadError { path, source }),
    }
}

impl Journal {
    pub fn content_path(&self, doc: DocumentRef) -> PathBuf {
        self.journal_dir
            .join(doc.dir_name())
            .join(format!("{}.md", doc.id()))
    }

    /// Content of a record; a missing file reads as empty
    pub fn read_content(&self, doc: DocumentRef) -> Result<String, StoreError> {
        let path = self.content_path(doc);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(StoreError::ReadError { path, source }),
        }
    }

    /// Title of an active record, or `NotFound`
    pub fn title_of(&self, doc: DocumentRef) -> Result<String, StoreError> {
        let title = match doc {
            DocumentRef::Log(id) => self
                .index
                .log(id)
                .filter(|l| l.status == Status::Active)
                .map(|l| l.title.clone()),
            DocumentRef::Summary(id) => self
                .index
                .summary(id)
                .filter(|s| s.status == Status::Active)
                .map(|s| s.title.clone()),
            DocumentRef::Template(id) => self
                .index
                .template(id)
                .filter(|t| t.status == Status::Active)
                .map(|t| t.name.clone()),
        };
        title.ok_or(StoreError::NotFound(doc))
    }

    fn write_index(&self) -> Result<(), StoreError> {
        let path = self.journal_dir.join(INDEX_FILE);
        let json = serde_json::to_string_pretty(&self.index)?;
        if let Err(source) = recovery::atomic_write(&path, json.as_bytes()) {
            recovery::log_recovery(
                &self.journal_dir,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    category: RecoveryCategory::Index,
                    description: format!("{} not written", INDEX_FILE),
                    fields: vec![("Error".to_string(), source.to_string())],
                    body: json,
                },
            );
            return Err(StoreError::WriteError { path, source });
        }
        Ok(())
    }

    fn write_content(&self, doc: DocumentRef, title: &str, text: &str) -> Result<(), StoreError> {
        let path = self.content_path(doc);
        let result = match path.parent() {
            Some(dir) => fs::create_dir_all(dir)
                .and_then(|()| recovery::atomic_write(&path, text.as_bytes())),
            None => recovery::atomic_write(&path, text.as_bytes()),
        };
        if let Err(source) = result {
            recovery::log_failed_save(&self.journal_dir, doc, title, text, &source);
            return Err(StoreError::WriteError { path, source });
        }
        Ok(())
    }

    fn lock(&self) -> Result<JournalLock, StoreError> {
        Ok(JournalLock::acquire_default(&self.journal_dir)?)
    }

    /// Take the lock and re-read the index, so changes another process made
    /// since load are not written over
    fn lock_fresh(&mut self) -> Result<JournalLock, StoreError> {
        let lock = self.lock()?;
        self.index = read_index(&self.journal_dir)?;
        Ok(lock)
    }

    // -----------------------------------------------------------------------
    // Record creation
    // -----------------------------------------------------------------------

    /// Create an empty log titled `title`
    pub fn create_log(&mut self, title: &str, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let _lock = self.lock_fresh()?;
        let id = self.index.allocate_id();
        self.index.logs.push(LogEntry {
            id,
            creator_id: self.config.journal.owner_id,
            status: Status::Active,
            create_time: now,
            update_time: now,
            title: title.to_string(),
            content: String::new(),
        });
        self.write_content(DocumentRef::Log(id), title, "")?;
        self.write_index()?;
        log::info!("created log {} {:?}", id, title);
        Ok(id)
    }

    /// Store a generated report
    pub fn create_summary(
        &mut self,
        title: &str,
        content: &str,
        log_ids: Vec<u64>,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::MissingTitle(DocumentRef::Summary(self.index.next_id)));
        }
        let _lock = self.lock_fresh()?;
        let id = self.index.allocate_id();
        let doc = DocumentRef::Summary(id);
        self.write_content(doc, title, content)?;
        self.index.summaries.push(Summary {
            id,
            creator_id: self.config.journal.owner_id,
            status: Status::Active,
            create_time: now,
            update_time: now,
            title: title.to_string(),
            log_ids,
            content: String::new(),
        });
        self.write_index()?;
        log::info!("saved summary {} {:?}", id, title);
        Ok(id)
    }

    /// Store a template; a default template takes the flag from any other
    pub fn create_template(
        &mut self,
        name: &str,
        content: &str,
        is_default: bool,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let _lock = self.lock_fresh()?;
        let id = self.index.allocate_id();
        self.write_content(DocumentRef::Template(id), name, content)?;
        if is_default {
            self.index.templates.iter_mut().for_each(|t| t.is_default = false);
        }
        self.index.templates.push(SummaryTemplate {
            id,
            creator_id: self.config.journal.owner_id,
            status: Status::Active,
            create_time: now,
            update_time: now,
            name: name.to_string(),
            is_default,
            content: String::new(),
        });
        self.write_index()?;
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Record updates
    // -----------------------------------------------------------------------

    /// Soft delete: the record is marked deleted, its content file stays
    pub fn delete(&mut self, doc: DocumentRef) -> Result<(), StoreError> {
        let _lock = self.lock_fresh()?;
        self.title_of(doc)?;
        let now = Utc::now();
        match doc {
            DocumentRef::Log(id) => {
                if let Some(l) = self.index.log_mut(id) {
                    l.status = Status::Deleted;
                    l.update_time = now;
                }
            }
            DocumentRef::Summary(id) => {
                if let Some(s) = self.index.summary_mut(id) {
                    s.status = Status::Deleted;
                    s.update_time = now;
                }
            }
            DocumentRef::Template(id) => {
                if let Some(t) = self.index.template_mut(id) {
                    t.status = Status::Deleted;
                    t.is_default = false;
                    t.update_time = now;
                }
            }
        }
        self.write_index()?;
        log::info!("deleted {}", doc);
        Ok(())
    }

    /// Make template `id` the only default
    pub fn set_default_template(&mut self, id: u64) -> Result<(), StoreError> {
        let _lock = self.lock_fresh()?;
        self.title_of(DocumentRef::Template(id))?;
        for t in self.index.templates.iter_mut() {
            t.is_default = t.id == id;
        }
        self.write_index()
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    pub fn ui_state(&self) -> UiState {
        state::read_ui_state(&self.journal_dir).unwrap_or_default()
    }

    pub fn save_ui_state(&self, ui: &UiState) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        state::write_ui_state(&self.journal_dir, ui).map_err(|source| StoreError::WriteError {
            path: self.journal_dir.join(".state.json"),
            source,
        })
    }
}

impl DocumentStore for Journal {
    fn load(&self, doc: DocumentRef) -> Result<StoredDocument, StoreError> {
        let title = self.title_of(doc)?;
        let text = self.read_content(doc)?;
        Ok(StoredDocument { text, title })
    }

    fn save(&mut self, doc: DocumentRef, text: &str, title: &str) -> Result<(), StoreError> {
        if doc.requires_title() && title.trim().is_empty() {
            return Err(StoreError::MissingTitle(doc));
        }
        let _lock = self.lock_fresh()?;
        self.title_of(doc)?;
        self.write_content(doc, title, text)?;

        let now = Utc::now();
        match doc {
            DocumentRef::Log(id) => {
                if let Some(l) = self.index.log_mut(id) {
                    l.title = title.to_string();
                    l.update_time = now;
                }
            }
            DocumentRef::Summary(id) => {
                if let Some(s) = self.index.summary_mut(id) {
                    s.title = title.to_string();
                    s.update_time = now;
                }
            }
            DocumentRef::Template(id) => {
                if let Some(t) = self.index.template_mut(id) {
                    t.name = title.to_string();
                    t.update_time = now;
                }
            }
        }
        self.write_index()?;
        log::info!("saved {} ({} bytes)", doc, text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn new_journal() -> (TempDir, Journal) {
        let tmp = TempDir::new().unwrap();
        let journal = init_journal(tmp.path(), "test").unwrap();
        (tmp, journal)
    }

    #[test]
    fn test_init_and_discover() {
        let (tmp, journal) = new_journal();
        assert!(journal.journal_dir.join("logs").is_dir());
        assert!(journal.journal_dir.join(INDEX_FILE).is_file());

        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_journal(&nested).unwrap(), tmp.path());
        assert!(matches!(
            init_journal(tmp.path(), "again"),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_journal(tmp.path()),
            Err(StoreError::NotAJournal(_))
        ));
    }

    #[test]
    fn test_log_round_trip_through_disk() {
        let (tmp, mut journal) = new_journal();
        let id = journal.create_log("20240513", Utc::now()).unwrap();
        let doc = DocumentRef::Log(id);
        journal.save(doc, "# Mon\n- [ ] a", "Monday").unwrap();

        let reloaded = load_journal(tmp.path()).unwrap();
        assert_eq!(
            reloaded.load(doc).unwrap(),
            StoredDocument {
                text: "# Mon\n- [ ] a".into(),
                title: "Monday".into()
            }
        );
        assert_eq!(reloaded.index.next_id, id + 1);
    }

    #[test]
    fn test_soft_delete_keeps_content() {
        let (_tmp, mut journal) = new_journal();
        let id = journal.create_log("x", Utc::now()).unwrap();
        journal.save(DocumentRef::Log(id), "keep", "x").unwrap();
        journal.delete(DocumentRef::Log(id)).unwrap();

        assert!(matches!(
            journal.load(DocumentRef::Log(id)),
            Err(StoreError::NotFound(_))
        ));
        assert!(journal.content_path(DocumentRef::Log(id)).is_file());
        assert_eq!(journal.index.log(id).map(|l| l.status), Some(Status::Deleted));
        assert!(journal.delete(DocumentRef::Log(id)).is_err());
    }

    #[test]
    fn test_summary_requires_title() {
        let (_tmp, mut journal) = new_journal();
        assert!(matches!(
            journal.create_summary("  ", "text", vec![1], Utc::now()),
            Err(StoreError::MissingTitle(_))
        ));
        let id = journal
            .create_summary("week 20", "text", vec![1, 2], Utc::now())
            .unwrap();
        let doc = DocumentRef::Summary(id);
        assert!(matches!(
            journal.save(doc, "edited", ""),
            Err(StoreError::MissingTitle(_))
        ));
        assert_eq!(journal.load(doc).unwrap().text, "text");
        assert_eq!(journal.index.summary(id).unwrap().log_ids, vec![1, 2]);
    }

    #[test]
    fn test_single_default_template() {
        let (_tmp, mut journal) = new_journal();
        let a = journal.create_template("a", "## A", true, Utc::now()).unwrap();
        let b = journal.create_template("b", "## B", true, Utc::now()).unwrap();
        assert_eq!(journal.index.default_template().map(|t| t.id), Some(b));
        journal.set_default_template(a).unwrap();
        assert_eq!(journal.index.default_template().map(|t| t.id), Some(a));
        journal.delete(DocumentRef::Template(a)).unwrap();
        assert!(journal.index.default_template().is_none());
    }

    #[test]
    fn test_two_handles_do_not_overwrite_each_other() {
        let (tmp, _journal) = new_journal();
        let mut first = load_journal(tmp.path()).unwrap();
        let mut second = load_journal(tmp.path()).unwrap();

        let a = first.create_log("a", Utc::now()).unwrap();
        let b = second.create_log("b", Utc::now()).unwrap();
        assert_ne!(a, b);
        second.save(DocumentRef::Log(b), "text", "b").unwrap();
        first.delete(DocumentRef::Log(a)).unwrap();

        let reloaded = load_journal(tmp.path()).unwrap();
        let titles: Vec<(&str, Status)> = reloaded
            .index
            .logs
            .iter()
            .map(|l| (l.title.as_str(), l.status))
            .collect();
        assert_eq!(titles, vec![("a", Status::Deleted), ("b", Status::Active)]);
        assert_eq!(reloaded.index.next_id, b + 1);
    }

    #[test]
    fn test_missing_content_file_reads_empty() {
        let (_tmp, mut journal) = new_journal();
        let id = journal.create_log("x", Utc::now()).unwrap();
        fs::remove_file(journal.content_path(DocumentRef::Log(id))).unwrap();
        assert_eq!(journal.load(DocumentRef::Log(id)).unwrap().text, "");
    }

    #[test]
    fn test_ui_state_defaults_when_absent() {
        let (_tmp, journal) = new_journal();
        assert_eq!(journal.ui_state(), UiState::default());
        let ui = UiState {
            sort_order: vec![2, 1],
            privacy_mode: true,
            ..Default::default()
        };
        journal.save_ui_state(&ui).unwrap();
        assert_eq!(journal.ui_state(), ui);
    }
}
