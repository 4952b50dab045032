//! Embeds a font file into a C++ header as a static byte array.

use std::process::ExitCode;

use font_header::cli::{self, Action, GenerateConfig};
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> ExitCode {
    let config = match cli::get_action(std::env::args_os()) {
        Action::Generate(config) => config,
        Action::Usage(usage) => {
            println!("{usage}");
            return ExitCode::FAILURE;
        }
    };

    init_logger();
    run(&config)
}

/// Generates the header described by `config` and reports the outcome.
fn run(config: &GenerateConfig) -> ExitCode {
    match font_header::generate(&config.input, &config.output, &config.identifier) {
        Ok(size) => {
            println!("Generated {} ({size} bytes)", config.output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the global logger, writing warnings and above to stderr unless `RUST_LOG` selects
/// another level.
fn init_logger() {
    if let Err(error) = SimpleLogger::new().with_level(LevelFilter::Warn).env().init() {
        eprintln!("failed to initialize logger: {error}");
    }
}
