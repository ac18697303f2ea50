//! tabula - a small terminal text editor
//!
//! This is the main entry point. It parses CLI arguments, sets up logging and
//! configuration, and hands over to the terminal session.

use tabula::cli::Cli;
use tabula::config::Config;
use tabula::error::EditorError;
use tabula::{logging, run, user_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse()?;
    if cli.help {
        println!("{}", Cli::usage());
        return Ok(());
    }

    if let Some(path) = logging::resolve_log_path(cli.log_file.as_deref()) {
        logging::init_file_logger(&path)?;
    }

    // Load configuration: compiled-in defaults, then the rc file, then flags
    let mut config = Config::default();
    user_config::configure(&mut config);
    match &cli.config_file {
        Some(path) => {
            if !config.load_rc_file(path)? {
                return Err(EditorError::InvalidArgument(format!(
                    "config file {} not found",
                    path.display()
                ))
                .into());
            }
        }
        None => {
            if let Some(path) = Config::default_rc_path() {
                if let Err(e) = config.load_rc_file(&path) {
                    log::warn!("ignoring rc file: {}", e);
                }
            }
        }
    }
    cli.apply_to_config(&mut config);

    for file in &cli.files {
        run::validate_file_path(file)?;
    }
    run::check_terminal()?;
    run::run_terminal_mode(&cli.files, &config)?;

    Ok(())
}
