//! `xlsel-engine`: in-memory tables and the row transforms behind each menu action.
//!
//! Pure crate: tables in, tables and counts out. No file I/O, no prompts.

pub mod clean;
pub mod column;
pub mod dedupe;
pub mod error;
pub mod merge;
pub mod sheet;
pub mod split;
pub mod table;

pub use column::ColumnRef;
pub use error::EngineError;
pub use table::{Cell, Table};
