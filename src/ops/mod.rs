pub mod editor;
pub mod extract;
pub mod grouping;
pub mod outline;
pub mod prompt;
pub mod reorder;
pub mod visibility;
