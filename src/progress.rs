//! Append-only progress log
//!
//! Each event becomes one line `<YYYY-Mon-DD-HH-MM-SS>: <message>` in a file
//! that is opened, appended to and closed per call. Failing to write the log
//! never fails the job.

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// strftime format for progress log timestamps, e.g. `2024-Mar-05-14-07-09`
pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H-%M-%S";

/// Handle to the progress log file. Clones share the failure count, so a
/// broken log file is warned about once per run.
#[derive(Clone, Debug)]
pub struct ProgressLog {
    path: PathBuf,
    failures: Arc<AtomicUsize>,
}

impl ProgressLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines that could not be written
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Record a progress event with the current local time
    pub fn log(&self, message: &str) {
        self.log_at(Local::now(), message);
    }

    /// Record a progress event with an explicit timestamp
    pub fn log_at(&self, at: DateTime<Local>, message: &str) {
        log::info!("{}", message);

        let line = format_line(at, message);
        if let Err(e) = self.append(&line) {
            // Only the first failure is worth a warning; the rest would repeat it
            if self.failures.fetch_add(1, Ordering::Relaxed) == 0 {
                log::warn!(
                    "Failed to write progress log {}: {}",
                    self.path.display(),
                    e
                );
            } else {
                log::debug!("Progress log write failed again: {}", e);
            }
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

/// Render one log line, newline included
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("{}: {}\n", at.format(TIMESTAMP_FORMAT), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_format_line() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            format_line(at, "ETL Job Started"),
            "2024-Mar-05-14-07-09: ETL Job Started\n"
        );
    }

    #[test]
    fn test_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("code_log.txt");
        let progress = ProgressLog::new(&path);

        progress.log("first");
        progress.clone().log("second");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first"));
        assert!(lines[1].ends_with(": second"));
    }

    #[test]
    fn test_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("code_log.txt");
        std::fs::write(&path, "earlier run\n").unwrap();

        ProgressLog::new(&path).log("next run");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.ends_with(": next run\n"));
    }

    #[test]
    fn test_write_failure_does_not_panic() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let progress = ProgressLog::new(temp_dir.path());

        progress.log("lost");
        progress.log("lost again");

        assert_eq!(progress.failures(), 2);
    }
}
