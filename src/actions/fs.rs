//! Filesystem action primitives
//!
//! Each function checks its own arity, touches the filesystem and returns the
//! path the next step should see (or an empty string when nothing is worth
//! forwarding).

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::debug;

use super::{ActionError, Arity, TIME_FORMAT};
use crate::types::ActionKind;

/// Create `args[0]` if missing (existing content is kept). Returns the path.
pub fn create_file(args: &[String]) -> Result<String, ActionError> {
    Arity::Exactly(1).check(ActionKind::Create, args)?;
    let path = &args[0];

    open_for_write(ActionKind::Create, path, false)?;
    debug!("created {}", path);
    Ok(path.clone())
}

/// Remove `args[0]`. Returns an empty string.
pub fn remove_file(args: &[String]) -> Result<String, ActionError> {
    Arity::Exactly(1).check(ActionKind::Remove, args)?;
    let path = &args[0];

    fs::remove_file(path).map_err(|e| ActionError::io(ActionKind::Remove, path, e))?;
    Ok(String::new())
}

/// Rename `args[0]` to `args[1]`. Returns the new path.
pub fn rename_file(args: &[String]) -> Result<String, ActionError> {
    Arity::Exactly(2).check(ActionKind::Rename, args)?;
    let (old_path, new_path) = (&args[0], &args[1]);

    fs::rename(old_path, new_path)
        .map_err(|e| ActionError::io(ActionKind::Rename, old_path, e))?;
    Ok(new_path.clone())
}

/// Read the inode change time of `args[0]`, formatted in local time.
pub fn ctime_file(args: &[String]) -> Result<String, ActionError> {
    Arity::Exactly(1).check(ActionKind::CTime, args)?;
    let path = &args[0];

    if !is_existing_file(path) {
        return Err(ActionError::NotFound {
            action: ActionKind::CTime,
            path: path.clone(),
        });
    }

    let stat = nix::sys::stat::stat(Path::new(path))
        .map_err(|errno| ActionError::io(ActionKind::CTime, path, errno.into()))?;

    let nanos = u32::try_from(stat.st_ctime_nsec).unwrap_or(0);
    let ctime = DateTime::from_timestamp(stat.st_ctime, nanos).ok_or_else(|| {
        ActionError::io(
            ActionKind::CTime,
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "change time out of range"),
        )
    })?;

    Ok(ctime.with_timezone(&Local).format(TIME_FORMAT).to_string())
}

/// Overwrite the existing file `args[0]` with one line per remaining argument.
pub fn write_lines(args: &[String]) -> Result<String, ActionError> {
    Arity::AtLeast(1).check(ActionKind::Write, args)?;
    let path = &args[0];

    if !is_existing_file(path) {
        return Err(ActionError::NotFound {
            action: ActionKind::Write,
            path: path.clone(),
        });
    }

    let mut buf = String::new();
    for line in &args[1..] {
        buf.push_str(line);
        buf.push('\n');
    }

    let mut file = open_for_write(ActionKind::Write, path, true)?;
    file.write_all(buf.as_bytes())
        .map_err(|e| ActionError::io(ActionKind::Write, path, e))?;
    file.sync_all()
        .map_err(|e| ActionError::io(ActionKind::Write, path, e))?;

    debug!("wrote {} bytes to {}", buf.len(), path);
    Ok(path.clone())
}

/// Directories do not count as existing files.
fn is_existing_file(path: &str) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

fn open_for_write(action: ActionKind, path: &str, truncate: bool) -> Result<File, ActionError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(truncate)
        .open(path)
        .map_err(|e| ActionError::io(action, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn path_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_create_returns_path_and_keeps_content() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "a.txt");
        fs::write(&path, "keep").unwrap();

        assert_eq!(create_file(&[path.clone()]).unwrap(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[test]
    fn test_create_rejects_extra_args() {
        let err = create_file(&["a".to_string(), "b".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn test_remove_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = remove_file(&[path_in(&dir, "missing")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_returns_empty() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "gone.txt");
        fs::write(&path, "").unwrap();

        assert_eq!(remove_file(&[path.clone()]).unwrap(), "");
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_rename_returns_new_path() {
        let dir = TempDir::new().unwrap();
        let old = path_in(&dir, "old.txt");
        let new = path_in(&dir, "new.txt");
        fs::write(&old, "x").unwrap();

        assert_eq!(rename_file(&[old.clone(), new.clone()]).unwrap(), new);
        assert!(Path::new(&new).exists());
        assert!(!Path::new(&old).exists());
    }

    #[test]
    fn test_rename_needs_two_args() {
        let err = rename_file(&["only".to_string()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "rename: invalid argument count, expected 2 got 1"
        );
    }

    #[test]
    fn test_ctime_format() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "t.txt");
        fs::write(&path, "").unwrap();

        let stamp = ctime_file(&[path]).unwrap();
        assert!(NaiveDateTime::parse_from_str(&stamp, TIME_FORMAT).is_ok(), "{}", stamp);
    }

    #[test]
    fn test_ctime_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ctime_file(&[dir.path().to_string_lossy().into_owned()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_write_lines() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "w.txt");
        fs::write(&path, "previous content that is long").unwrap();

        let out = write_lines(&[path.clone(), "a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(out, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_write_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let err = write_lines(&[path_in(&dir, "nope.txt"), "a".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = write_lines(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }
}
