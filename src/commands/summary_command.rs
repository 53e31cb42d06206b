//! Camera, lens and image summary command
//!
//! Prints the records that fall into one of the interest groups,
//! leaving every other record out.

use log::info;

use crate::commands::command_traits::Command;
use crate::tiff::document::{Category, Document};
use crate::tiff::errors::TiffResult;

/// Command printing the grouped records of a file
pub struct SummaryCommand {
    /// Path to the input file
    input_file: String,
    /// Whether to print the file header first
    show_header: bool,
}

impl SummaryCommand {
    pub fn new(input_file: String, show_header: bool) -> Self {
        SummaryCommand { input_file, show_header }
    }
}

impl Command for SummaryCommand {
    fn execute(&self) -> TiffResult<()> {
        let document = Document::open(&self.input_file)?;
        let groups = document.interesting_records();
        info!("{} of {} records are in a group", groups.len(), document.all_records().len());

        if self.show_header {
            print!("{}", document.file_header_fields());
            println!();
        }

        for category in [Category::Camera, Category::Lens, Category::Image] {
            println!("[{}]", category.name());
            for record in groups.get(category) {
                println!("  {}: {}", record.tag_name(), record.value);
            }
        }

        Ok(())
    }
}
