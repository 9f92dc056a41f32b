//! Rotating file sink.
//!
//! # Design Decisions
//! - Size and backup-count limits plus compression are enforced by `file-rotate`
//!   on every write; a file only rotates between records, never inside one
//! - The file is opened once up front so an unwritable destination is reported
//!   at build time instead of swallowing every later write
//! - Rotated files past the age limit are pruned when the sink opens and again
//!   after every rotation
//! - Rotated files are named `<file>.<n>` (`<file>.<n>.gz` once compressed)

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};

use crate::error::SinkError;
use crate::record::LogRecord;
use crate::sink::{lock, provision_dir, Sink};

/// Rotation limits for the file sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// The live file rotates before the first write after it grew past this size.
    pub max_bytes: usize,
    pub max_backups: usize,
    pub max_age: Duration,
    pub compress: bool,
}

/// Fixed policy: 100 MB per file, 5 backups, 7 days, compressed.
pub const ROTATION_POLICY: RotationPolicy = RotationPolicy {
    max_bytes: 100 * 1024 * 1024,
    max_backups: 5,
    max_age: Duration::from_secs(7 * 24 * 60 * 60),
    compress: true,
};

/// Sink appending JSON lines to a size-rotated file.
pub struct RotatingFileSink {
    path: PathBuf,
    dir: PathBuf,
    base_name: String,
    policy: RotationPolicy,
    state: Mutex<WriterState>,
}

struct WriterState {
    writer: FileRotate<AppendCount>,
    /// Bytes in the live file, tracked to spot the write that rotates it.
    live_bytes: u64,
}

impl RotatingFileSink {
    /// Open `dir/file_name`, creating any missing parent directories.
    ///
    /// `file_name` may contain path segments; their directories are created too.
    pub fn open(dir: &Path, file_name: &str, policy: RotationPolicy) -> Result<Self, SinkError> {
        let path = dir.join(file_name);
        let parent = path.parent().unwrap_or(dir).to_path_buf();
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SinkError::Open {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "log file name is empty"),
            })?;

        provision_dir(&parent)?;
        let live_bytes = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|file| file.metadata())
            .map(|meta| meta.len())
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        prune_expired(&parent, &base_name, policy.max_age, SystemTime::now());

        let compression = if policy.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        };
        let writer = FileRotate::new(
            &path,
            AppendCount::new(policy.max_backups),
            ContentLimit::BytesSurpassed(policy.max_bytes),
            compression,
            #[cfg(unix)]
            None,
        );

        Ok(Self {
            path,
            dir: parent,
            base_name,
            policy,
            state: Mutex::new(WriterState { writer, live_bytes }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileSink").field("path", &self.path).finish()
    }
}

impl Sink for RotatingFileSink {
    fn write_record(&self, record: &LogRecord<'_>) -> io::Result<()> {
        let line = record.encode_line()?;
        let mut state = lock(&self.state);

        let rotates = state.live_bytes > self.policy.max_bytes as u64;
        state.writer.write_all(&line)?;

        if rotates {
            // The reopened file must exist; file-rotate drops writes silently otherwise.
            state.live_bytes = fs::metadata(&self.path)?.len();
            prune_expired(&self.dir, &self.base_name, self.policy.max_age, SystemTime::now());
        } else {
            state.live_bytes += line.len() as u64;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        lock(&self.state).writer.flush()
    }
}

/// Remove rotated siblings of `file_name` last modified more than `max_age` before `now`.
///
/// The live file itself is never touched. Errors are ignored: a file that cannot
/// be inspected or removed is left for the next pass.
fn prune_expired(dir: &Path, file_name: &str, max_age: Duration, now: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let prefix = format!("{}.", file_name);

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_rotated_name(name, &prefix) {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > max_age);

        if expired && fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// `app.log.3` and `app.log.3.gz` are rotated names; `app.log.bak` is not.
fn is_rotated_name(name: &str, prefix: &str) -> bool {
    let Some(suffix) = name.strip_prefix(prefix) else {
        return false;
    };
    let index = suffix.strip_suffix(".gz").unwrap_or(suffix);
    !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;
    use crate::level::Severity;
    use tempfile::TempDir;

    #[test]
    fn test_policy_constants() {
        assert_eq!(ROTATION_POLICY.max_bytes, 100 * 1024 * 1024);
        assert_eq!(ROTATION_POLICY.max_backups, 5);
        assert_eq!(ROTATION_POLICY.max_age.as_secs(), 604_800);
        assert!(ROTATION_POLICY.compress);
    }

    #[test]
    fn test_rotated_name_matching() {
        assert!(is_rotated_name("app.log.1", "app.log."));
        assert!(is_rotated_name("app.log.12.gz", "app.log."));
        assert!(!is_rotated_name("app.log", "app.log."));
        assert!(!is_rotated_name("app.log.", "app.log."));
        assert!(!is_rotated_name("app.log.bak", "app.log."));
        assert!(!is_rotated_name("other.log.1", "app.log."));
    }

    #[test]
    fn test_writes_json_lines_to_file() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app.log", ROTATION_POLICY).unwrap();

        let fields = [Field::string("request_id", "abc")];
        sink.write_record(&LogRecord::new(Severity::Error, "failed: 500", &fields))
            .unwrap();
        sink.flush().unwrap();

        let contents = fs::read_to_string(dir.path().join("app.log")).unwrap();
        let value: serde_json::Value = serde_json::from_str(contents.trim_end()).unwrap();
        assert_eq!(value["msg"], "failed: 500");
        assert_eq!(value["request_id"], "abc");
        assert_eq!(sink.path(), dir.path().join("app.log"));
    }

    #[test]
    fn test_prune_removes_only_expired_backups() {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        let old = now - Duration::from_secs(8 * 24 * 60 * 60);

        for name in ["app.log", "app.log.1", "app.log.2.gz", "app.log.3", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        for name in ["app.log", "app.log.1", "app.log.2.gz", "notes.txt"] {
            let file = fs::File::options().write(true).open(dir.path().join(name)).unwrap();
            file.set_modified(old).unwrap();
        }

        let removed = prune_expired(dir.path(), "app.log", ROTATION_POLICY.max_age, now);
        assert_eq!(removed, 2);
        assert!(dir.path().join("app.log").exists());
        assert!(!dir.path().join("app.log.1").exists());
        assert!(!dir.path().join("app.log.2.gz").exists());
        assert!(dir.path().join("app.log.3").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_open_creates_parents_of_nested_file_name() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "svc/app.log", ROTATION_POLICY).unwrap();
        assert!(dir.path().join("svc").is_dir());
        assert!(sink.path().is_file());
    }

    #[test]
    fn test_open_fails_when_path_is_a_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("app.log")).unwrap();

        let err = RotatingFileSink::open(dir.path(), "app.log", ROTATION_POLICY).unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
        assert!(err.to_string().starts_with("failed to open log file "));
    }

    #[test]
    fn test_open_fails_when_file_name_crosses_a_regular_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blocker"), b"").unwrap();

        let err = RotatingFileSink::open(dir.path(), "blocker/app.log", ROTATION_POLICY).unwrap_err();
        assert!(matches!(err, SinkError::Provision { .. }));
    }

    #[test]
    fn test_rotation_keeps_records_whole() {
        let dir = TempDir::new().unwrap();
        let policy = RotationPolicy {
            max_bytes: 64,
            compress: false,
            ..ROTATION_POLICY
        };
        let sink = RotatingFileSink::open(dir.path(), "app.log", policy).unwrap();

        for i in 0..3 {
            let msg = format!("record number {} padded past the size limit", i);
            sink.write_record(&LogRecord::new(Severity::Info, &msg, &[])).unwrap();
        }
        sink.flush().unwrap();

        let live = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(live.lines().count(), 1);
        for name in ["app.log", "app.log.1", "app.log.2"] {
            let contents = fs::read_to_string(dir.path().join(name)).unwrap();
            for line in contents.lines() {
                serde_json::from_str::<serde_json::Value>(line).unwrap();
            }
        }
    }

    #[test]
    fn test_rotation_prunes_expired_backups_while_open() {
        let dir = TempDir::new().unwrap();
        let policy = RotationPolicy {
            max_bytes: 64,
            compress: false,
            ..ROTATION_POLICY
        };
        let sink = RotatingFileSink::open(dir.path(), "app.log", policy).unwrap();

        // A backup that aged past the limit while the sink stayed open.
        let stale = dir.path().join("app.log.4");
        fs::write(&stale, b"x").unwrap();
        let eight_days = Duration::from_secs(8 * 24 * 60 * 60);
        let file = fs::File::options().write(true).open(&stale).unwrap();
        file.set_modified(SystemTime::now() - eight_days).unwrap();
        drop(file);

        let msg = "a message long enough to push the live file past its limit";
        sink.write_record(&LogRecord::new(Severity::Info, msg, &[])).unwrap();
        assert!(stale.exists());

        sink.write_record(&LogRecord::new(Severity::Info, msg, &[])).unwrap();
        assert!(dir.path().join("app.log.1").exists());
        assert!(!stale.exists());
    }
}
