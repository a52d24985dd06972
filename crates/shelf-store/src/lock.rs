//! Advisory locking for record file access.
//!
//! A record file is replaced under an OS-level exclusive lock (`flock` on
//! Unix, `LockFileEx` on Windows) and read under a shared lock, so two
//! writers cannot interleave and a reader never observes a partially
//! written file. The lock is tied to the guard's lifetime: dropping it —
//! on success, error, or panic — releases the lock.

use std::fs::{File, Metadata, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;
use tracing::warn;

/// An open record file holding an advisory lock.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
}

impl LockedFile {
    /// Open (or create) the file and block until the exclusive lock is
    /// acquired.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// Open an existing file read-only and block until a shared lock is
    /// acquired. Fails with `NotFound` if the file does not exist.
    pub fn acquire_shared(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;
        Ok(Self { file })
    }

    /// Metadata read through the still-locked handle.
    pub fn metadata(&self) -> io::Result<Metadata> {
        self.file.metadata()
    }

    /// Read the whole file while holding the lock.
    pub fn read_contents(&mut self) -> io::Result<String> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut text = String::new();
        self.file.read_to_string(&mut text)?;
        Ok(text)
    }

    /// Replace the file's contents with `bytes` while holding the lock.
    pub fn replace_contents(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(bytes)?;
        self.file.sync_all()
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            // Best-effort: the lock also dies with the file handle.
            warn!(error = %e, "failed to release record file lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");
        assert!(!path.exists());

        let _lock = LockedFile::acquire(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn acquire_shared_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.data");
        let err = LockedFile::acquire_shared(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn replace_contents_truncates_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");
        std::fs::write(&path, "a much longer previous content").unwrap();

        let mut lock = LockedFile::acquire(&path).unwrap();
        lock.replace_contents(b"short").unwrap();
        drop(lock);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn read_contents_sees_data_written_under_the_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");

        let mut lock = LockedFile::acquire(&path).unwrap();
        lock.replace_contents(b"a=1").unwrap();
        assert_eq!(lock.read_contents().unwrap(), "a=1");
    }

    #[test]
    fn shared_locks_do_not_exclude_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");
        std::fs::write(&path, "a=1").unwrap();

        let mut one = LockedFile::acquire_shared(&path).unwrap();
        let mut two = LockedFile::acquire_shared(&path).unwrap();
        assert_eq!(one.read_contents().unwrap(), "a=1");
        assert_eq!(two.read_contents().unwrap(), "a=1");
    }

    #[test]
    fn metadata_through_the_locked_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");

        let mut lock = LockedFile::acquire(&path).unwrap();
        lock.replace_contents(b"a=1").unwrap();
        assert_eq!(lock.metadata().unwrap().len(), 3);
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.data");

        {
            let mut lock = LockedFile::acquire(&path).unwrap();
            lock.replace_contents(b"one").unwrap();
        }

        // A second acquisition must not dead-block.
        let mut lock = LockedFile::acquire(&path).unwrap();
        lock.replace_contents(b"two").unwrap();
        drop(lock);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }
}
