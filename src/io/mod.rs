pub mod config_io;
pub mod journal_io;
pub mod lock;
pub mod recovery;
pub mod session;
pub mod state;
pub mod store;
pub mod summarizer;
