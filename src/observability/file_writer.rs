//! Size-rotated append-only file shared by the log layer and the span
//! exporter.
//!
//! When the file grows past its size limit it is renamed to
//! `<name>.<YYYYmmdd-HHMMSS>` and a fresh file is started. Only the newest
//! backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Rotation threshold (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups retained after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file. The handle is opened lazily on first write.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation, opening or writing fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.append(&buf)
    }

    /// Appends raw bytes, rotating first if the file is over its limit.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation, opening or writing fails.
    pub fn append(&self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("log file lock poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > self.max_bytes) {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }

        match guard.as_mut() {
            Some(file) => {
                file.write_all(bytes)?;
                file.flush()
            }
            None => Err(io::Error::new(io::ErrorKind::Other, "log file unavailable")),
        }
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}"));
        fs::rename(&self.path, PathBuf::from(backup))?;
        self.prune_backups()
    }

    fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let Some(parent) = self.path.parent() else {
            return Ok(Vec::new());
        };
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };
        let prefix = format!("{name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        // Timestamps sort lexically; newest first.
        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups)
    }

    fn prune_backups(&self) -> io::Result<()> {
        for old in self.backups()?.iter().skip(self.max_backups) {
            // Best effort.
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// Cloneable [`Write`] handle for `tracing_subscriber::fmt`.
#[derive(Debug, Clone)]
pub struct SharedLog(pub Arc<RotatingFile>);

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = RotatingFile::new(dir.path().join("dashview.log"));
        log.write_line("one").unwrap();
        log.write_line("two").unwrap();
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn rotates_and_keeps_newest_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashview.log");
        for stamp in ["20200101-000000.000", "20210101-000000.000", "20220101-000000.000"] {
            fs::write(dir.path().join(format!("dashview.log.{stamp}")), "old").unwrap();
        }
        fs::write(&path, "x".repeat(64)).unwrap();

        let log = RotatingFile::with_limits(path.clone(), 32, 2);
        log.write_line("fresh").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        let backups = log.backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(!backups.iter().any(|p| p.to_string_lossy().ends_with("20200101-000000.000")));
        assert!(!backups.iter().any(|p| p.to_string_lossy().ends_with("20210101-000000.000")));
    }

    #[test]
    fn shared_handle_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = SharedLog(Arc::new(RotatingFile::new(dir.path().join("a.log"))));
        write!(handle, "hello").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.log")).unwrap(), "hello");
    }
}
