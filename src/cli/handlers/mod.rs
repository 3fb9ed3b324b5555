mod init;
pub use init::cmd_init;

use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::journal_io;
use crate::io::lock::JournalLock;
use crate::io::recovery::{self, PRUNE_AGE_DAYS};
use crate::io::session::Session;
use crate::io::state::UiState;
use crate::io::store::{DocumentStore, StoreError};
use crate::io::summarizer::{ChatClient, summarize_logs};
use crate::logging::{self, LOG_ENV};
use crate::model::block::{Block, BlockKind};
use crate::model::document::Document;
use crate::model::entry::{DocumentRef, LogEntry, Status, SummaryTemplate};
use crate::model::journal::Journal;
use crate::ops::editor::{EditAction, Editor, Notice};
use crate::ops::extract::extract_unfinished_tasks;
use crate::ops::grouping::{date_title, group_by_week, move_in_order, sort_by_manual_order, summary_title};
use crate::ops::visibility::{hidden_blocks, visible_blocks};
use crate::parse::{self, serialize_blocks};

/// Validation failures of command arguments
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("block {index} out of range (document has {len} blocks)")]
    BlockIndex { index: usize, len: usize },
    #[error("unknown block type \"{0}\" (expected p, todo, h1, h2 or h3)")]
    UnknownKind(String),
    #[error("no earlier log to carry tasks from")]
    NoPreviousLog,
    #[error("invalid config key \"{0}\" (expected section.field)")]
    InvalidKey(String),
    #[error("config key \"{0}\" is not set")]
    UnknownKey(String),
    #[error("privacy mode must be \"on\" or \"off\", not \"{0}\"")]
    PrivacyMode(String),
    #[error("cannot resolve -C path '{path}': {source}")]
    JournalDir {
        path: String,
        source: std::io::Error,
    },
}

/// Global flags every handler sees
pub struct Context {
    pub json: bool,
    /// Resolved `-C` directory
    pub journal_dir: Option<PathBuf>,
    pub verbose: u8,
}

impl Context {
    fn from_cli(cli: &Cli) -> Result<Self, CommandError> {
        let journal_dir = match &cli.journal_dir {
            Some(dir) => Some(std::fs::canonicalize(dir).map_err(|source| CommandError::JournalDir {
                path: dir.clone(),
                source,
            })?),
            None => None,
        };
        Ok(Context {
            json: cli.json,
            journal_dir,
            verbose: cli.verbose,
        })
    }

    /// Where journal discovery starts
    pub fn start_dir(&self) -> std::io::Result<PathBuf> {
        match &self.journal_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Start logging for commands that run without a journal
    pub fn init_default_logging(&self) -> Result<(), logging::LoggingError> {
        let env = std::env::var(LOG_ENV).ok();
        logging::init_logging(&logging::resolve_level(env.as_deref(), self.verbose, "warn"), None)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        // Commands that need no journal
        Commands::Init(args) => cmd_init(args, &ctx),
        Commands::Extract(args) => cmd_extract(args, &ctx),
        Commands::Fmt(args) => cmd_fmt(args, &ctx),

        // Logs
        Commands::New(args) => cmd_new(args, &ctx),
        Commands::List(args) => cmd_list(args, &ctx),
        Commands::Show(args) => cmd_show(args, &ctx),
        Commands::Write(args) => cmd_write(args, &ctx),
        Commands::Edit(args) => cmd_edit(args, &ctx),
        Commands::Carry(args) => cmd_carry(args, &ctx),
        Commands::Mv(args) => cmd_mv(args, &ctx),
        Commands::Delete(args) => cmd_delete(args, &ctx),
        Commands::Privacy(args) => cmd_privacy(args, &ctx),

        // Reports
        Commands::Summarize(args) => cmd_summarize(args, &ctx),
        Commands::Summary(args) => cmd_summary(args, &ctx),
        Commands::Template(args) => cmd_template(args, &ctx),

        // Maintenance
        Commands::Recovery(args) => cmd_recovery(args, &ctx),
        Commands::Config(args) => cmd_config(args, &ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Discover and load the journal, then start logging as it is configured
fn open_journal(ctx: &Context) -> Result<Journal, Box<dyn std::error::Error>> {
    let root = journal_io::discover_journal(&ctx.start_dir()?)?;
    let journal = journal_io::load_journal(&root)?;

    let env = std::env::var(LOG_ENV).ok();
    let level = logging::resolve_level(env.as_deref(), ctx.verbose, &journal.config.log.level);
    let log_dir = journal
        .config
        .log
        .dir
        .as_ref()
        .map(|dir| journal.journal_dir.join(dir));
    logging::init_logging(&level, log_dir.as_deref())?;
    log::debug!("journal at {}", journal.root.display());
    Ok(journal)
}

fn doc_ref(args: DocArgs) -> DocumentRef {
    if args.summary {
        DocumentRef::Summary(args.id)
    } else if args.template {
        DocumentRef::Template(args.id)
    } else {
        DocumentRef::Log(args.id)
    }
}

fn doc_kind(doc: DocumentRef) -> &'static str {
    match doc {
        DocumentRef::Log(_) => "log",
        DocumentRef::Summary(_) => "summary",
        DocumentRef::Template(_) => "template",
    }
}

/// Read a whole file, or stdin when no path is given
fn read_input(file: Option<&str>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Decode `text` with the remembered heading flags and privacy mode applied
fn prepare_editor(ui: &UiState, doc: DocumentRef, text: &str) -> Editor {
    let mut blocks = parse::parse_blocks(text);
    ui.apply_heading_flags(doc, &mut blocks);
    let mut editor = Editor::new(Document::new(blocks));
    editor.set_privacy_mode(ui.privacy_mode);
    editor
}

fn open_session(journal: &Journal, ui: &UiState, doc: DocumentRef) -> Result<Session, StoreError> {
    let stored = journal.load(doc)?;
    let editor = prepare_editor(ui, doc, &stored.text);
    let delay = Duration::from_millis(journal.config.editor.autosave_ms);
    Ok(Session::with_editor(doc, stored, editor, delay))
}

/// Flush the session. A failed save has already been copied to the
/// recovery log by the journal.
fn close_session(session: Session, journal: &mut Journal) -> Result<Document, Box<dyn std::error::Error>> {
    let dirty = session.is_dirty();
    let doc = session.doc();
    let document = session.close(journal, Instant::now())?;
    if dirty {
        log::debug!("{} closed after save", doc);
    }
    Ok(document)
}

/// Task counts of a stored log; unreadable content counts as empty
fn log_counts(journal: &Journal, id: u64) -> (usize, usize) {
    match journal.read_content(DocumentRef::Log(id)) {
        Ok(text) => Document::from_markdown(&text).task_counts(),
        Err(e) => {
            log::warn!("could not read log {}: {}", id, e);
            (0, 0)
        }
    }
}

/// Active log `id` with its content loaded
fn load_log(journal: &Journal, id: u64) -> Result<LogEntry, StoreError> {
    let doc = DocumentRef::Log(id);
    let mut entry = journal
        .index
        .log(id)
        .filter(|l| l.status == Status::Active)
        .cloned()
        .ok_or(StoreError::NotFound(doc))?;
    entry.content = journal.read_content(doc)?;
    Ok(entry)
}

/// Active template `id` with its content loaded
fn load_template(journal: &Journal, id: u64) -> Result<SummaryTemplate, StoreError> {
    let doc = DocumentRef::Template(id);
    let mut template = journal
        .index
        .template(id)
        .filter(|t| t.status == Status::Active)
        .cloned()
        .ok_or(StoreError::NotFound(doc))?;
    template.content = journal.read_content(doc)?;
    Ok(template)
}

/// Import the unfinished tasks of log `source` into log `target`
fn carry_tasks(
    journal: &mut Journal,
    ui: &UiState,
    target: u64,
    source: u64,
) -> Result<Notice, Box<dyn std::error::Error>> {
    let source_text = journal.load(DocumentRef::Log(source))?.text;
    let mut session = open_session(journal, ui, DocumentRef::Log(target))?;
    let transition = session.apply(EditAction::ImportTasks { source_text }, Instant::now());
    close_session(session, journal)?;
    log::info!("carried tasks from log {} into log {}", source, target);
    Ok(transition.notice.unwrap_or(Notice::NothingToImport))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Journal-less commands
// ---------------------------------------------------------------------------

fn cmd_extract(args: FileArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.init_default_logging()?;
    let text = read_input(args.file.as_deref())?;
    let blocks = extract_unfinished_tasks(&text);

    if ctx.json {
        let json: Vec<_> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| block_to_json(i, b, false))
            .collect();
        return print_json(&json);
    }
    if !blocks.is_empty() {
        println!("{}", serialize_blocks(&blocks));
    }
    Ok(())
}

fn cmd_fmt(args: FileArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.init_default_logging()?;
    let text = read_input(args.file.as_deref())?;
    println!("{}", parse::normalize(&text));
    Ok(())
}

// ---------------------------------------------------------------------------
// Log commands
// ---------------------------------------------------------------------------

fn cmd_new(args: NewArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    let now = Utc::now();
    let title = args
        .title
        .unwrap_or_else(|| date_title(now.with_timezone(&Local).date_naive()));
    let id = journal.create_log(&title, now)?;

    let mut notice = None;
    if args.carry {
        match journal.index.previous_log(id).map(|l| l.id) {
            Some(source) => {
                let ui = journal.ui_state();
                notice = Some(carry_tasks(&mut journal, &ui, id, source)?);
            }
            None => log::debug!("no earlier log to carry from"),
        }
    }

    if ctx.json {
        print_json(&serde_json::json!({
            "id": id,
            "title": title,
            "notice": notice.map(notice_text),
        }))
    } else {
        println!("{} {}", id, title);
        if let Some(notice) = notice {
            println!("{}", notice_text(notice));
        }
        Ok(())
    }
}

fn cmd_list(args: ListArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;
    let ui = journal.ui_state();

    let mut logs: Vec<&LogEntry> = if args.all {
        journal.index.logs.iter().collect()
    } else {
        journal.index.active_logs().collect()
    };
    sort_by_manual_order(&mut logs, &ui.sort_order);
    let now = Local::now().naive_local();
    let groups = group_by_week(logs, now, |l| l.create_time.with_timezone(&Local).naive_local());

    if ctx.json {
        let json: Vec<WeekJson> = groups
            .iter()
            .map(|g| WeekJson {
                key: g.key.to_string(),
                label: g.label.clone(),
                this_week: g.this_week,
                logs: g
                    .items
                    .iter()
                    .map(|l| log_to_json(l, log_counts(&journal, l.id)))
                    .collect(),
            })
            .collect();
        return print_json(&json);
    }

    if groups.is_empty() {
        println!("no logs");
        return Ok(());
    }
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", group.label);
        for log in &group.items {
            println!("{}", format_log_line(log, log_counts(&journal, log.id)));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;
    let doc = doc_ref(args.doc);
    print_document(&journal, doc, args.blocks, args.all, ctx.json)
}

/// Print a document's text, or its block table. Blocks under collapsed
/// or private headings are left out unless `all`.
fn print_document(
    journal: &Journal,
    doc: DocumentRef,
    blocks: bool,
    all: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ui = journal.ui_state();
    let stored = journal.load(doc)?;
    let editor = prepare_editor(&ui, doc, &stored.text);
    let hidden = editor.hidden();

    let text = if all || hidden.is_empty() {
        stored.text.clone()
    } else {
        serialize_blocks(&visible_blocks(editor.blocks(), ui.privacy_mode))
    };

    if json {
        let block_json = blocks.then(|| {
            editor
                .blocks()
                .iter()
                .enumerate()
                .filter(|(_, b)| all || !hidden.contains(&b.id))
                .map(|(i, b)| block_to_json(i, b, hidden.contains(&b.id)))
                .collect()
        });
        return print_json(&DocumentJson {
            id: doc.id(),
            kind: doc_kind(doc),
            title: stored.title,
            text,
            blocks: block_json,
        });
    }

    if blocks {
        for line in format_block_table(editor.blocks(), &hidden, all) {
            println!("{}", line);
        }
    } else if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

fn cmd_write(args: WriteArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    let ui = journal.ui_state();
    let doc = doc_ref(args.doc);
    let mut session = open_session(&journal, &ui, doc)?;
    let text = read_input(args.file.as_deref())?;

    let now = Instant::now();
    session.apply(EditAction::Replace { text }, now);
    if let Some(title) = &args.title {
        session.set_title(title, now);
    }
    let changed = session.is_dirty();
    let title = session.title().to_string();
    close_session(session, &mut journal)?;

    if ctx.json {
        print_json(&serde_json::json!({
            "id": doc.id(),
            "kind": doc_kind(doc),
            "title": title,
            "changed": changed,
        }))
    } else {
        if changed {
            println!("saved {}", doc);
        } else {
            println!("{} unchanged", doc);
        }
        Ok(())
    }
}

/// Translate a CLI edit op into an editor action, checking indexes
fn edit_action(op: EditOp, blocks: &[Block]) -> Result<EditAction, CommandError> {
    let check = |index: usize| {
        if index < blocks.len() {
            Ok(index)
        } else {
            Err(CommandError::BlockIndex {
                index,
                len: blocks.len(),
            })
        }
    };

    Ok(match op {
        EditOp::Type { index, text } => EditAction::SetContent {
            index: check(index)?,
            content: text,
        },
        EditOp::Enter { index } => EditAction::Enter { index: check(index)? },
        EditOp::Backspace { index } => EditAction::Backspace {
            index: check(index)?,
            cursor: 0,
        },
        EditOp::Check { index } => EditAction::ToggleChecked { index: check(index)? },
        EditOp::Collapse { index } => EditAction::ToggleCollapsed { index: check(index)? },
        EditOp::Private { index } => EditAction::TogglePrivate { index: check(index)? },
        EditOp::Kind { index, kind } => EditAction::SetKind {
            index: check(index)?,
            kind: BlockKind::parse_name(&kind).ok_or(CommandError::UnknownKind(kind))?,
        },
        EditOp::Move { source, target } => EditAction::Reorder {
            source: blocks[check(source)?].id,
            target: blocks[check(target)?].id,
        },
    })
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    let mut ui = journal.ui_state();
    let doc = doc_ref(args.doc);
    let mut session = open_session(&journal, &ui, doc)?;

    let action = edit_action(args.op, session.editor().blocks())?;
    let transition = session.apply(action, Instant::now());
    let document = close_session(session, &mut journal)?;

    let before = ui.clone();
    ui.remember_heading_flags(doc, document.blocks());
    if ui != before {
        journal.save_ui_state(&ui)?;
    }

    if ctx.json {
        return print_json(&transition_to_json(&transition, document.blocks()));
    }
    let hidden = hidden_blocks(document.blocks(), ui.privacy_mode);
    for line in format_block_table(document.blocks(), &hidden, false) {
        println!("{}", line);
    }
    if let Some(notice) = transition.notice {
        println!("{}", notice_text(notice));
    }
    Ok(())
}

fn cmd_carry(args: CarryArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    let source = match args.from {
        Some(id) => id,
        None => journal
            .index
            .previous_log(args.id)
            .map(|l| l.id)
            .ok_or(CommandError::NoPreviousLog)?,
    };
    let ui = journal.ui_state();
    let notice = carry_tasks(&mut journal, &ui, args.id, source)?;

    if ctx.json {
        print_json(&serde_json::json!({
            "id": args.id,
            "from": source,
            "notice": notice_text(notice),
        }))
    } else {
        println!("{}", notice_text(notice));
        Ok(())
    }
}

fn cmd_mv(args: MvArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;
    for id in [args.id, args.target] {
        journal.title_of(DocumentRef::Log(id))?;
    }
    let mut ui = journal.ui_state();

    // Materialize the displayed order before moving within it
    let mut logs: Vec<&LogEntry> = journal.index.active_logs().collect();
    sort_by_manual_order(&mut logs, &ui.sort_order);
    let current: Vec<u64> = logs.iter().map(|l| l.id).collect();
    ui.sort_order = move_in_order(&current, args.id, args.target);
    journal.save_ui_state(&ui)?;

    if ctx.json {
        print_json(&serde_json::json!({ "sort_order": ui.sort_order }))
    } else {
        println!("moved log {}", args.id);
        Ok(())
    }
}

fn cmd_delete(args: IdArg, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    journal.delete(DocumentRef::Log(args.id))?;
    let mut ui = journal.ui_state();
    ui.forget_log(args.id);
    journal.save_ui_state(&ui)?;
    if !ctx.json {
        println!("deleted log {}", args.id);
    }
    Ok(())
}

fn cmd_privacy(args: PrivacyArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;
    let mut ui = journal.ui_state();

    if let Some(mode) = args.mode {
        ui.privacy_mode = match mode.to_ascii_lowercase().as_str() {
            "on" | "true" => true,
            "off" | "false" => false,
            _ => return Err(CommandError::PrivacyMode(mode).into()),
        };
        journal.save_ui_state(&ui)?;
    }

    if ctx.json {
        print_json(&serde_json::json!({ "privacy_mode": ui.privacy_mode }))
    } else {
        println!("privacy mode {}", if ui.privacy_mode { "on" } else { "off" });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report commands
// ---------------------------------------------------------------------------

fn cmd_summarize(args: SummarizeArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    let logs = args
        .ids
        .iter()
        .map(|&id| load_log(&journal, id))
        .collect::<Result<Vec<_>, _>>()?;
    let template = match args.template {
        Some(id) => Some(load_template(&journal, id)?),
        None => match journal.index.default_template().map(|t| t.id) {
            Some(id) => Some(load_template(&journal, id)?),
            None => None,
        },
    };

    let client = ChatClient::from_config(&journal.config.summary)?;
    let summary = summarize_logs(&client, &logs, template.as_ref())?;

    let mut saved_id = None;
    let mut title = None;
    if args.save {
        let dates: Vec<_> = logs
            .iter()
            .map(|l| l.create_time.with_timezone(&Local).date_naive())
            .collect();
        let t = args
            .title
            .unwrap_or_else(|| summary_title(&dates, Local::now().date_naive()));
        saved_id = Some(journal.create_summary(&t, &summary, args.ids.clone(), Utc::now())?);
        title = Some(t);
    }

    if ctx.json {
        return print_json(&ReportJson {
            summary,
            saved_id,
            title,
        });
    }
    println!("{}", summary.trim_end());
    if let (Some(id), Some(title)) = (saved_id, title) {
        eprintln!("saved summary {} \"{}\"", id, title);
    }
    Ok(())
}

fn cmd_summary(args: SummaryCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    match args.action {
        SummaryAction::List => {
            let mut summaries: Vec<_> = journal.index.active_summaries().collect();
            summaries.sort_by(|a, b| b.create_time.cmp(&a.create_time).then(b.id.cmp(&a.id)));
            if ctx.json {
                let json: Vec<_> = summaries.iter().map(|s| summary_to_json(s)).collect();
                return print_json(&json);
            }
            if summaries.is_empty() {
                println!("no summaries");
            }
            for s in summaries {
                println!("{}", format_record_line(s.id, s.create_time, &s.title, ""));
            }
            Ok(())
        }
        SummaryAction::Show { id } => print_document(&journal, DocumentRef::Summary(id), false, true, ctx.json),
        SummaryAction::Delete { id } => {
            journal.delete(DocumentRef::Summary(id))?;
            if !ctx.json {
                println!("deleted summary {}", id);
            }
            Ok(())
        }
    }
}

fn cmd_template(args: TemplateCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal(ctx)?;
    match args.action {
        TemplateAction::List => {
            let templates: Vec<_> = journal.index.active_templates().collect();
            if ctx.json {
                let json: Vec<_> = templates.iter().map(|t| template_to_json(t)).collect();
                return print_json(&json);
            }
            if templates.is_empty() {
                println!("no templates");
            }
            for t in templates {
                let marker = if t.is_default { "  (default)" } else { "" };
                println!("{}", format_record_line(t.id, t.create_time, &t.name, marker));
            }
            Ok(())
        }
        TemplateAction::Add(add) => {
            let content = read_input(add.file.as_deref())?;
            let id = journal.create_template(&add.name, &parse::normalize(&content), add.default, Utc::now())?;
            if ctx.json {
                print_json(&serde_json::json!({ "id": id, "name": add.name }))
            } else {
                println!("{} {}", id, add.name);
                Ok(())
            }
        }
        TemplateAction::Show { id } => print_document(&journal, DocumentRef::Template(id), false, true, ctx.json),
        TemplateAction::Default { id } => {
            journal.set_default_template(id)?;
            if !ctx.json {
                println!("template {} is the default", id);
            }
            Ok(())
        }
        TemplateAction::Delete { id } => {
            journal.delete(DocumentRef::Template(id))?;
            if !ctx.json {
                println!("deleted template {}", id);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance commands
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;

    if args.prune {
        let before = if args.everything {
            None
        } else {
            let days = args.days.unwrap_or(PRUNE_AGE_DAYS);
            Some(Utc::now() - chrono::Duration::days(days))
        };
        let _lock = JournalLock::acquire_default(&journal.journal_dir)?;
        let removed = recovery::prune_recovery(&journal.journal_dir, before)?;
        if ctx.json {
            return print_json(&serde_json::json!({ "removed": removed }));
        }
        println!("removed {} recovery entries", removed);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&journal.journal_dir, args.limit);
    if ctx.json {
        let json: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
        return print_json(&json);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal(ctx)?;
    let (config, mut doc) = config_io::read_config(&journal.journal_dir)?;

    match (args.key, args.value) {
        (None, _) => {
            if ctx.json {
                return print_json(&config);
            }
            print!("{}", doc);
        }
        (Some(key), None) => {
            let value = config_io::get_value(&doc, &key).ok_or(CommandError::UnknownKey(key))?;
            if ctx.json {
                return print_json(&value);
            }
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            config_io::set_value(&mut doc, &key, &value).ok_or_else(|| CommandError::InvalidKey(key.clone()))?;
            let _lock = JournalLock::acquire_default(&journal.journal_dir)?;
            config_io::write_config(&journal.journal_dir, &doc)?;
            log::info!("set {} = {}", key, value);
            if !ctx.json {
                println!("{} = {}", key, value);
            }
        }
    }
    Ok(())
}
