//! File logging
//!
//! A full-screen editor owns the terminal, so log records go to a file or
//! nowhere. The sink is chosen with `--log PATH` or the `TABULA_LOG`
//! environment variable; without either, logging stays off. The file is
//! truncated on every start.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::error::{EditorError, Result};

/// Environment variable naming the log file
pub const LOG_ENV_VAR: &str = "TABULA_LOG";

/// Log file from the command line, falling back to the environment
pub fn resolve_log_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    cli_path.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(LOG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Install a debug-level logger writing to `path`
pub fn init_file_logger(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| EditorError::io(path, e))?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(LevelFilter::Debug, config, file)
        .map_err(|e| EditorError::Logger(e.to_string()))?;
    log::info!("tabula {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}
