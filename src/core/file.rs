//! File I/O for buffers

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::core::buffer::Buffer;
use crate::error::{EditorError, Result};

/// Split file contents into rows, dropping each line's trailing `\n`/`\r`
/// characters. A final newline does not start an extra row.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&b| b == b'\n')
        .map(|line| {
            let end = line
                .iter()
                .rposition(|&b| b != b'\r')
                .map_or(0, |i| i + 1);
            &line[..end]
        })
        .collect()
}

impl Buffer {
    /// Load `path` into a fresh buffer. The filename is set and the syntax is
    /// chosen from it; the buffer starts clean.
    pub fn open(path: impl AsRef<Path>, settings: &Settings) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| EditorError::io(path, e))?;

        let mut buffer = Buffer::with_settings(settings);
        buffer.filename = Some(path.to_path_buf());
        buffer.syntax = crate::core::syntax::syntax_for_filename(path);
        buffer.ingest_lines(split_lines(&bytes));

        log::info!(
            "opened {} ({} rows, {} bytes)",
            path.display(),
            buffer.numrows(),
            bytes.len()
        );
        Ok(buffer)
    }

    /// Write the buffer to its filename. Returns the number of bytes written
    /// and marks the buffer clean; on failure the dirty counter is untouched.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.filename.clone().ok_or(EditorError::NoFilename)?;
        let contents = self.rows_to_string();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| EditorError::io(&path, e))?;
        file.write_all(&contents)
            .map_err(|e| EditorError::io(&path, e))?;

        self.dirty = 0;
        log::info!("saved {} ({} bytes)", path.display(), contents.len());
        Ok(contents.len())
    }

    /// Give the buffer a new filename, re-select its syntax and save
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        self.filename = Some(path.into());
        self.select_syntax();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b"a\nb\n"), vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"a\r\nb"), vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"\n\n"), vec![&b""[..], &b""[..]]);
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn test_save_without_filename() {
        let mut buffer = Buffer::from_lines(["x"]);
        buffer.dirty = 1;
        assert!(matches!(buffer.save(), Err(EditorError::NoFilename)));
        assert_eq!(buffer.dirty, 1);
    }

    #[test]
    fn test_open_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.c");
        let err = Buffer::open(&path, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("nope.c"));
    }
}
