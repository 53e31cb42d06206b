use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use exifwalk::utils::logger::Logger;
use exifwalk::commands::{CommandFactory, ExifCommandFactory};

fn main() {
    let matches = ClapCommand::new("exifwalk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Walk the directories of a TIFF/EXIF file and print its metadata")
        .arg(
            Arg::new("input")
                .help("Input TIFF, DNG or other TIFF-based raw file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .help("List every directory and record instead of the camera/lens/image summary")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("header")
                .long("header")
                .help("Print the file header fields (always part of --all)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log output to this file as well as stderr")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Warn };

    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }

    let factory = ExifCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
