//! Full directory dump command
//!
//! This module implements the command listing the file header, every
//! loaded directory and every record in it, in discovery order.

use log::debug;

use crate::commands::command_traits::Command;
use crate::tiff::document::Document;
use crate::tiff::errors::TiffResult;

/// Command printing all directories and records of a file
pub struct DumpCommand {
    /// Path to the input file
    input_file: String,
}

impl DumpCommand {
    pub fn new(input_file: String) -> Self {
        DumpCommand { input_file }
    }
}

impl Command for DumpCommand {
    fn execute(&self) -> TiffResult<()> {
        let document = Document::open(&self.input_file)?;
        debug!("Dumping {} directories", document.directories().len());

        print!("{}", document);
        Ok(())
    }
}
