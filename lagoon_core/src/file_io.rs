//! # File I/O Module
//!
//! Budget files live on shared office drives as often as on laptops, so
//! project persistence has two safety features:
//!
//! - **Atomic saves**: write to .tmp, fsync, rename - a killed process
//!   never leaves a half-written budget behind
//! - **Advisory locking**: a `.lgn.lock` sidecar names who is editing,
//!   backed by an OS-level lock via `fs2`
//!
//! Projects are saved as `.lgn` (Lagoon) files containing JSON. The
//! schema version in the header is validated on load.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lagoon_core::file_io::{save_project, load_project, FileLock};
//! use lagoon_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Vila Nova Residence", "A. Carvalho", 4);
//! let path = Path::new("vila_nova.lgn");
//!
//! let lock = FileLock::acquire(path, "estimator@office")?;
//! save_project(&project, path)?;
//! drop(lock); // releases the lock
//! # Ok::<(), lagoon_core::errors::EstimateError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Lock metadata stored in .lgn.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
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
/// Two layers: an OS-level exclusive lock (via fs2) for process safety,
/// and a sidecar file with metadata so a colleague who finds the file
/// busy can see who to call.
pub struct FileLock {
    /// Path to the project file
    project_path: PathBuf,
    /// Path to the lock sidecar
    lock_path: PathBuf,
    /// The underlying handle (holds the OS lock while alive)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// Stale locks (dead process, or older than a day) are taken over
    /// silently.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - lock acquired
    /// * `Err(EstimateError::FileLocked)` - someone else is editing
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EstimateResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(EstimateError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                EstimateError::file_error(
                    "create lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            EstimateError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| EstimateError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            EstimateError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            EstimateError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
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

    /// Path to the project file this lock guards
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file drops
    }
}

fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> EstimateResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone or it is over a day old.
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

/// Save a project with atomic write semantics.
///
/// Serialize, write to a `.lgn.tmp` sibling, fsync, then rename over
/// the target. An interrupted save leaves the previous file intact.
///
/// # Example
///
/// ```rust,no_run
/// use lagoon_core::file_io::save_project;
/// use lagoon_core::project::Project;
/// use std::path::Path;
///
/// let project = Project::new("Beach House", "R. Lima", 5);
/// save_project(&project, Path::new("beach_house.lgn"))?;
/// # Ok::<(), lagoon_core::errors::EstimateError>(())
/// ```
pub fn save_project(project: &Project, path: &Path) -> EstimateResult<()> {
    let json =
        serde_json::to_string_pretty(project).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("lgn.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        EstimateError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a project from a `.lgn` file.
///
/// # Returns
///
/// * `Ok(Project)` - successfully loaded
/// * `Err(EstimateError::VersionMismatch)` - incompatible file version
/// * `Err(EstimateError::SerializationError)` - invalid JSON
/// * `Err(EstimateError::FileError)` - I/O error
pub fn load_project(path: &Path) -> EstimateResult<Project> {
    let mut file = File::open(path).map_err(|e| {
        EstimateError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;

    Ok(project)
}

/// Load a project, also reporting whether someone else holds the lock.
///
/// # Returns
///
/// * `Ok((Project, None))` - loaded, no lock
/// * `Ok((Project, Some(LockInfo)))` - loaded, but locked elsewhere
/// * `Err(_)` - failed to load
pub fn load_project_with_lock_check(path: &Path) -> EstimateResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    let lock_info = FileLock::check(path);
    Ok((project, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> EstimateResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(EstimateError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(EstimateError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a newer minor version means a newer schema than
    // this build understands
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 {
        if file_parts[1] > current_parts[1] {
            return Err(EstimateError::VersionMismatch {
                file_version: file_version.to_string(),
                expected_version: SCHEMA_VERSION.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("lagoon_test_{}.lgn", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let project_path = Path::new("/path/to/budget.lgn");
        let lock_path = lock_path_for(project_path);
        assert_eq!(lock_path, Path::new("/path/to/budget.lgn.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("estimator@office");
        assert_eq!(info.user_id, "estimator@office");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let project = Project::new("Roundtrip Pool", "Test Client", 4);
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.name, "Roundtrip Pool");
        assert_eq!(loaded.meta.client, "Test Client");
        assert_eq!(loaded.meta.id, project.meta.id);
        assert_eq!(loaded.pool, project.pool);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_project_path("atomic");
        let tmp_path = path.with_extension("lgn.tmp");

        let project = Project::new("Atomic", "Client", 2);
        save_project(&project, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_project_path("lock_test");

        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "estimator@office").unwrap();
        assert_eq!(lock.info.user_id, "estimator@office");

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);

        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major fails
        assert!(validate_version("1.0.0").is_err());

        // Newer minor (in 0.x) fails
        assert!(validate_version("0.2.0").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_project_path("lock_check");

        let project = Project::new("Lock Check", "Client", 3);
        save_project(&project, &path).unwrap();

        let (loaded, lock_info) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Lock Check");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
