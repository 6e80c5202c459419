// File I/O operations

pub mod csv;
pub mod error;
pub mod inputs;
pub mod load;
pub mod write;
pub mod xlsx;

pub use error::IoError;
pub use inputs::FileKind;
pub use load::{load, LoadOptions, Loaded};
pub use write::{save, OutputFormat};
