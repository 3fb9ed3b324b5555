pub mod block;
pub mod config;
pub mod document;
pub mod entry;
pub mod journal;

pub use block::*;
pub use config::*;
pub use document::*;
pub use entry::*;
pub use journal::*;
