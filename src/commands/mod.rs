//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod summary_command;
pub mod dump_command;

pub use command_traits::{Command, CommandFactory};
pub use summary_command::SummaryCommand;
pub use dump_command::DumpCommand;

use clap::ArgMatches;
use crate::tiff::errors::{TiffError, TiffResult};

/// Factory for creating command instances based on CLI arguments
pub struct ExifCommandFactory;

impl ExifCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ExifCommandFactory
    }
}

impl Default for ExifCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for ExifCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> TiffResult<Box<dyn Command>> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();
        let show_header = args.get_flag("header");

        if args.get_flag("all") {
            Ok(Box::new(DumpCommand::new(input_file)))
        } else {
            Ok(Box::new(SummaryCommand::new(input_file, show_header)))
        }
    }
}
