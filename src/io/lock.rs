use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long writers wait for another `wl` process by default
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Advisory lock on a journal directory.
///
/// Held for the duration of a write (index, content file, state). Writers
/// re-read the index after taking it, so two processes never interleave
/// their read-modify-write cycles. Released on drop.
pub struct JournalLock {
    _file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another wl process is writing to this journal")]
    Timeout { path: PathBuf },
}

impl JournalLock {
    /// Wait up to `timeout` for exclusive access to `journal_dir`
    pub fn acquire(journal_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = journal_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::CreateError {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        let mut waited = false;
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    if waited {
                        log::debug!("acquired {} after {:?}", path.display(), start.elapsed());
                    }
                    return Ok(JournalLock { _file: file, path });
                }
                Err(_) if start.elapsed() < timeout => {
                    waited = true;
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => return Err(LockError::Timeout { path }),
            }
        }
    }

    pub fn acquire_default(journal_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(journal_dir, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_and_release() {
        let tmp = TempDir::new().unwrap();
        let lock = JournalLock::acquire_default(tmp.path()).unwrap();
        assert!(lock.path().ends_with(".lock"));
        drop(lock);
        assert!(JournalLock::acquire_default(tmp.path()).is_ok());
    }

    #[test]
    fn test_contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = JournalLock::acquire_default(tmp.path()).unwrap();
        let err = JournalLock::acquire(tmp.path(), Duration::from_millis(50))
            .err()
            .unwrap();
        assert!(matches!(err, LockError::Timeout { .. }));
        assert!(err.to_string().contains("another wl process"));
    }
}
