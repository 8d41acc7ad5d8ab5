//! # File I/O Module
//!
//! Writes exported documents with safety features:
//! - **Atomic writes**: Write to .tmp, sync, rename, so a reader never sees a
//!   partially written document
//! - **File locking**: Prevent two exports racing on the same target on shared drives
//!
//! Lock files use a `.lock` extension appended to the target's and contain
//! JSON metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xchg_core::assembler::DocumentAssembler;
//! use xchg_core::file_io::{write_document, FileLock};
//! use xchg_core::model::ModelData;
//! use xchg_core::observe::TracingObserver;
//! use xchg_core::settings::ExportSettings;
//!
//! let settings = ExportSettings::default();
//! let document = DocumentAssembler::new(&settings).assemble(&ModelData::default())?;
//! let path = Path::new("model.xml");
//!
//! // Acquire lock before writing
//! let lock = FileLock::acquire(path, "engineer@company.com")?;
//! write_document(&document, path, settings.indent, &TracingObserver)?;
//!
//! // Lock is released when dropped
//! drop(lock);
//! # Ok::<(), xchg_core::errors::ExportError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assembler::Document;
use crate::errors::{ExportError, ExportResult};
use crate::observe::EmitObserver;

/// Lock file metadata stored in .lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    target_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on an export target.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(ExportError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> ExportResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !is_lock_stale(&existing) {
                return Err(ExportError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(
                path = %path.display(),
                holder = existing.user_id.as_str(),
                "taking over stale lock"
            );
        }

        let lock_file = open_locked(path, &lock_path, &info)?;
        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a target is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Open the sidecar, take the OS lock, then replace its contents with `info`.
///
/// The file is only truncated once the lock is held, so a caller that loses
/// the race leaves the holder's metadata intact.
fn open_locked(target: &Path, lock_path: &Path, info: &LockInfo) -> ExportResult<File> {
    let lock_error = |operation: &str, e: std::io::Error| {
        ExportError::file_error(operation, lock_path.display().to_string(), e.to_string())
    };

    let mut lock_file = OpenOptions::new()
        .write(true)
        .read(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| lock_error("create lock", e))?;

    // Non-blocking: fail immediately if another handle holds it
    lock_file.try_lock_exclusive().map_err(|_| {
        ExportError::file_locked(
            target.display().to_string(),
            "another process".to_string(),
            "unknown".to_string(),
        )
    })?;

    let lock_json = serde_json::to_string_pretty(info).map_err(|e| ExportError::serialization(e.to_string()))?;
    lock_file.set_len(0).map_err(|e| lock_error("truncate lock", e))?;
    lock_file.seek(SeekFrom::Start(0)).map_err(|e| lock_error("seek lock", e))?;
    lock_file
        .write_all(lock_json.as_bytes())
        .map_err(|e| lock_error("write lock", e))?;
    lock_file.sync_all().map_err(|e| lock_error("sync lock", e))?;

    Ok(lock_file)
}

/// Get the lock file path for a target file
fn lock_path_for(target_path: &Path) -> PathBuf {
    with_appended_extension(target_path, "lock")
}

/// Get the temporary path an atomic write goes through
fn tmp_path_for(target_path: &Path) -> PathBuf {
    with_appended_extension(target_path, "tmp")
}

fn with_appended_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut result = path.to_path_buf();
    let extension = result
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    result.set_extension(extension);
    result
}

fn read_lock_info(lock_path: &Path) -> ExportResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        ExportError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        ExportError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| ExportError::serialization(e.to_string()))
}

/// Check if a lock is stale (holder process gone, or older than 24 hours)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Write text to `path` atomically.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path` (atomic on most filesystems)
///
/// If any step fails the temporary file is removed and `path` is untouched.
pub fn write_atomic(contents: &str, path: &Path) -> ExportResult<()> {
    let tmp_path = tmp_path_for(path);

    let result = (|| {
        let mut tmp_file = File::create(&tmp_path).map_err(|e| {
            ExportError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.write_all(contents.as_bytes()).map_err(|e| {
            ExportError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.sync_all().map_err(|e| {
            ExportError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        fs::rename(&tmp_path, path)
            .map_err(|e| ExportError::file_error("rename to final", path.display().to_string(), e.to_string()))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Serialize a document and write it atomically to `path`.
pub fn write_document(
    document: &Document,
    path: &Path,
    indent: usize,
    observer: &dyn EmitObserver,
) -> ExportResult<()> {
    let xml = document.to_xml(indent, observer)?;
    write_atomic(&xml, path)?;
    debug!(path = %path.display(), bytes = xml.len(), "document written");
    Ok(())
}

/// Hold a [`FileLock`] on `path` for the duration of [`write_document`].
pub fn export_locked(
    document: &Document,
    path: &Path,
    user_id: &str,
    indent: usize,
    observer: &dyn EmitObserver,
) -> ExportResult<()> {
    let _lock = FileLock::acquire(path, user_id)?;
    write_document(document, path, indent, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DocumentAssembler;
    use crate::model::{ModelData, Node};
    use crate::observe::NullObserver;
    use crate::settings::ExportSettings;

    fn sample_document() -> Document {
        let settings = ExportSettings::default();
        let model = ModelData {
            nodes: vec![Node::new(1, [0.0, 0.0, 0.0]), Node::new(2, [1.0, 0.0, 0.0])],
            ..Default::default()
        };
        DocumentAssembler::new(&settings).assemble(&model).unwrap()
    }

    #[test]
    fn test_lock_path_generation() {
        let target = Path::new("/path/to/model.xml");
        assert_eq!(lock_path_for(target), Path::new("/path/to/model.xml.lock"));
        assert_eq!(tmp_path_for(target), Path::new("/path/to/model.xml.tmp"));
        assert_eq!(lock_path_for(Path::new("model")), Path::new("model.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");
        let document = sample_document();

        write_document(&document, &path, 2, &NullObserver).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, document.to_xml(2, &NullObserver).unwrap());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_failed_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("model.xml");
        let err = write_atomic("<project/>", &path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");
        fs::write(&path, "old contents").unwrap();
        write_atomic("new contents", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new contents");
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert_eq!(lock.target_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());
        assert!(FileLock::check(&path).is_some());

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_second_acquire_keeps_holder_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");
        let lock_path = lock_path_for(&path);

        let holder = FileLock::acquire(&path, "holder@example.com").unwrap();
        let before = fs::read_to_string(&lock_path).unwrap();

        // A competing handle that got past the metadata check
        let err = open_locked(&path, &lock_path, &LockInfo::new("other@example.com")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        assert_eq!(fs::read_to_string(&lock_path).unwrap(), before);
        assert_eq!(read_lock_info(&lock_path).unwrap().user_id, "holder@example.com");
        assert_eq!(FileLock::check(&path).map(|i| i.user_id), Some("holder@example.com".to_string()));

        let err = FileLock::acquire(&path, "other@example.com").err().unwrap();
        assert!(err.is_recoverable());
        drop(holder);
    }

    #[test]
    fn test_stale_lock_contents_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");
        let lock_path = lock_path_for(&path);

        let mut stale = LockInfo::new("gone@example.com");
        stale.locked_at = Utc::now() - chrono::Duration::hours(48);
        let padded = format!("{}{}", serde_json::to_string_pretty(&stale).unwrap(), " ".repeat(512));
        fs::write(&lock_path, padded).unwrap();

        let lock = FileLock::acquire(&path, "new@example.com").unwrap();
        assert_eq!(read_lock_info(&lock_path).unwrap().user_id, "new@example.com");
        drop(lock);
    }

    #[test]
    fn test_export_locked_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");
        export_locked(&sample_document(), &path, "test@example.com", 0, &NullObserver).unwrap();
        assert!(path.exists());
        assert!(!lock_path_for(&path).exists());
    }
}
