pub mod io;
pub mod tiff;
pub mod utils;
pub mod commands;

pub use tiff::{Document, DirectoryEntry, ImageFileDirectory, TiffError, TiffResult, Value};
