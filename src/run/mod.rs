//! Application execution for tabula.
//!
//! Checks that the process can run a full-screen session and that the files
//! named on the command line are regular files, then hands over to the
//! terminal loop.

mod tui;

use std::io::IsTerminal;
use std::path::Path;

use crate::error::{EditorError, Result};

pub use tui::run_terminal_mode;

/// Refuse to start without a terminal on both ends
pub fn require_terminal(stdin_tty: bool, stdout_tty: bool) -> Result<()> {
    if stdin_tty && stdout_tty {
        Ok(())
    } else {
        Err(EditorError::InvalidArgument(
            "tabula needs an interactive terminal".to_string(),
        ))
    }
}

/// Check the real standard streams
pub fn check_terminal() -> Result<()> {
    require_terminal(std::io::stdin().is_terminal(), std::io::stdout().is_terminal())
}

/// Block device files, pipes and sockets that could hang the editor. A path
/// that does not exist yet is fine; it opens as a new file.
pub fn validate_file_path(path: &Path) -> Result<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(EditorError::io(path, e)),
    };
    if metadata.is_dir() {
        return Err(EditorError::InvalidArgument(format!(
            "{} is a directory",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        let ft = metadata.file_type();
        if ft.is_char_device() || ft.is_block_device() || ft.is_fifo() || ft.is_socket() {
            return Err(EditorError::InvalidArgument(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_terminal() {
        assert!(require_terminal(true, true).is_ok());
        assert!(require_terminal(false, true).is_err());
        assert!(require_terminal(true, false).is_err());
    }

    #[test]
    fn test_validate_file_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_file_path(&dir.path().join("new.c")).is_ok());
        assert!(validate_file_path(dir.path()).is_err());

        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_file_path(&file).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_device_files_are_rejected() {
        assert!(validate_file_path(Path::new("/dev/null")).is_err());
    }
}
