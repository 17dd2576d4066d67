// src/file.rs

use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    thread,
    time::{Duration, SystemTime},
};

use crate::config::consts::{LOCK_PAUSE_MS, LOCK_STALE_SECS, LOCK_TRIES};
use crate::error::LogError;

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Create the parent directory of `path`, if it has one.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// `<log>.lock` next to the log file.
pub fn lock_path_for(log: &Path) -> PathBuf {
    let mut s: OsString = log.as_os_str().to_owned();
    s.push(".lock");
    PathBuf::from(s)
}

/// Advisory single-writer lock: a lock file created exclusively and removed
/// on drop. A lock file older than `LOCK_STALE_SECS` is treated as left over
/// from a crashed run and taken over.
#[derive(Debug)]
pub struct LogLock {
    path: PathBuf,
}

impl LogLock {
    pub fn acquire(log: &Path) -> Result<Self, LogError> {
        Self::acquire_with(log, LOCK_TRIES, Duration::from_millis(LOCK_PAUSE_MS))
    }

    pub fn acquire_with(log: &Path, tries: u32, pause: Duration) -> Result<Self, LogError> {
        ensure_parent(log).map_err(|e| LogError::io(log, e))?;
        let path = lock_path_for(log);

        // Clearing a stale lock does not use up a try.
        let mut tries = tries.max(1);
        while tries > 0 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut f) => {
                    let _ = writeln!(f, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if clear_stale_lock(&path).map_err(|e| LogError::io(&path, e))? {
                        continue;
                    }
                    tries -= 1;
                    if tries > 0 {
                        thread::sleep(pause);
                    }
                }
                Err(e) => return Err(LogError::io(&path, e)),
            }
        }
        Err(LogError::Locked { path: log.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            logw!("could not remove lock {}: {}", self.path.display(), e);
        }
    }
}

/// Move a stale lock file out of the way. Returns `true` if one was removed.
///
/// The file is renamed to a per-process name first, so of several writers
/// that saw the same stale lock only one gets to remove it. The age is then
/// checked again on the renamed file: if it turns out to be a fresh lock that
/// another writer created in the meantime, it is linked back into place.
pub fn clear_stale_lock(lock: &Path) -> io::Result<bool> {
    if !is_stale(lock) {
        return Ok(false);
    }

    let mut aside: OsString = lock.as_os_str().to_owned();
    aside.push(format!(".stale.{}", std::process::id()));
    let aside = PathBuf::from(aside);

    match fs::rename(lock, &aside) {
        Ok(()) => {}
        // Someone else cleared it first.
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }

    if is_stale(&aside) {
        logw!("taking over stale lock {}", lock.display());
        fs::remove_file(&aside)?;
        return Ok(true);
    }

    match fs::hard_link(&aside, lock) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            logw!("lock {} was replaced while being restored", lock.display());
        }
        Err(e) => return Err(e),
    }
    fs::remove_file(&aside)?;
    Ok(false)
}

fn is_stale(lock: &Path) -> bool {
    fs::metadata(lock)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| SystemTime::now().duration_since(t).ok())
        .is_some_and(|age| age > Duration::from_secs(LOCK_STALE_SECS))
}
