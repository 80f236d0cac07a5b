//! UCI engine binary: stdin in, stdout out.

use std::fs::File;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use ocelot::engine::{Engine, EngineOptions};

#[derive(Parser)]
#[command(name = "ocelot", version, about = "UCI chess engine")]
struct Args {
    /// Polyglot-format opening book
    #[arg(long, value_name = "FILE")]
    book: Option<String>,

    /// Turn on logging into this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,

    /// Log level when logging is turned on
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let level = match args.log_level.as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            other => {
                eprintln!("{other}: invalid log level");
                return ExitCode::FAILURE;
            }
        };
        match File::create(path) {
            Ok(file) => {
                let _ = WriteLogger::init(level, Config::default(), file);
            }
            Err(err) => {
                eprintln!("cannot open log file {path}: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut options = EngineOptions::default();
    if let Some(book) = args.book {
        options.book_file = book;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut engine = Engine::with_options(stdout.lock(), options);
    match engine.run(stdin.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
