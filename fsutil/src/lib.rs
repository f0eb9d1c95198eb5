use std::{
    fs::{self, DirEntry, ReadDir},
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Not a directory '{0}'")]
        NotDir(PathBuf),
    }

    impl Error {
        pub fn path(&self) -> &std::path::Path {
            match self {
                Error::SingleIO(_, path, _) | Error::NotDir(path) => path,
            }
        }
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Reads a text file as a list of lines.
///
/// A trailing `\r` is dropped from every line and a final newline does not
/// produce an extra empty entry.
/// ```
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("lines.txt");
/// # std::fs::write(&path, "2+2\r\n\n5+5\n").unwrap();
/// let lines = fsutil::read_lines(&path).unwrap();
/// assert_eq!(lines, vec!["2+2", "", "5+5"]);
/// ```
#[must_use]
pub fn read_lines(filepath: impl AsRef<Path>) -> Result<Vec<String>> {
    let s = self::read_to_string(&filepath)?;
    Ok(s.lines().map(str::to_owned).collect())
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Lists the entries of `dir` in the order the file system reports them.
///
/// Unlike [`read_dir`], an entry that cannot be accessed is an error instead of
/// being silently skipped.
#[must_use]
pub fn list_entries(dir: impl AsRef<Path>) -> Result<Vec<DirEntry>> {
    let dir = dir.as_ref();
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotDir(dir.to_owned()));
    }
    self::read_dir(dir)?
        .map(|entry| {
            entry.map_err(|e| Error::SingleIO("Cannot access dir entry", dir.to_owned(), e))
        })
        .collect()
}

/// Returns whether the entry is a directory, following symlinks.
#[must_use]
pub fn is_dir_entry(entry: &DirEntry) -> Result<bool> {
    let ft = entry
        .file_type()
        .map_err(|e| Error::SingleIO("Cannot get filetype", entry.path(), e))?;
    if !ft.is_symlink() {
        return Ok(ft.is_dir());
    }
    match fs::metadata(entry.path()) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) => {
            // dangling link
            log::debug!("Cannot follow symlink {:?}: {}", entry.path(), e);
            Ok(false)
        }
    }
}

/// Lists the immediate subdirectories of `dir`, sorted by file name.
#[must_use]
pub fn list_subdirs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut res = Vec::new();
    for entry in self::list_entries(&dir)? {
        if self::is_dir_entry(&entry)? {
            res.push(entry.path());
        }
    }
    res.sort();
    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_lines_keeps_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        fs::write(&path, "4\n\n10").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["4", "", "10"]);
    }

    #[test]
    fn read_lines_of_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        assert!(read_lines(&path).unwrap().is_empty());
    }

    #[test]
    fn read_lines_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");

        let err = read_lines(&path).unwrap_err();
        assert_eq!(err.path(), path);
        assert!(err.to_string().starts_with("Cannot read file"));
    }

    #[test]
    fn list_subdirs_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bob")).unwrap();
        fs::create_dir(dir.path().join("alice")).unwrap();
        fs::write(dir.path().join("tests.txt"), "1\n").unwrap();

        let subdirs = list_subdirs(dir.path()).unwrap();
        assert_eq!(
            subdirs,
            vec![dir.path().join("alice"), dir.path().join("bob")]
        );
    }

    #[test]
    fn list_entries_of_file_is_not_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.txt");
        fs::write(&path, "1\n").unwrap();

        assert!(matches!(list_entries(&path), Err(Error::NotDir(p)) if p == path));
    }
}
