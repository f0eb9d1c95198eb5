use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::serdable::GlobPattern;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot list submissions: {0}")]
    Io(#[from] fsutil::Error),

    #[error("Ambiguous program in '{}': {} files match ({})", .dir.to_string_lossy(), .candidates.len(), .candidates.join(", "))]
    Ambiguous {
        dir: PathBuf,
        candidates: Vec<String>,
    },
}

/// How to pick the program when several files in a submission match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProgramSelection {
    /// First match in the order the file system lists the directory.
    #[default]
    FirstListed,
    /// Smallest matching file name.
    Lexicographic,
    /// Exactly one match is allowed.
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub dir: PathBuf,
    /// `None` when the directory holds no recognized program; scored as zero.
    pub program: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProgramFinder {
    pattern: GlobPattern,
    selection: ProgramSelection,
}

impl ProgramFinder {
    pub fn new(pattern: GlobPattern, selection: ProgramSelection) -> Self {
        Self { pattern, selection }
    }

    pub fn pattern(&self) -> &GlobPattern {
        &self.pattern
    }

    pub fn find_in(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let dir = dir.as_ref();
        let mut candidates = Vec::new();
        for entry in fsutil::list_entries(dir)? {
            if fsutil::is_dir_entry(&entry)? {
                continue;
            }
            let name = entry.file_name();
            if !self.pattern.matches(&name.to_string_lossy()) {
                continue;
            }
            if self.selection == ProgramSelection::FirstListed {
                return Ok(Some(entry.path()));
            }
            candidates.push(name);
        }

        match self.selection {
            ProgramSelection::FirstListed => Ok(None),
            ProgramSelection::Lexicographic => {
                Ok(candidates.into_iter().min().map(|name| dir.join(name)))
            }
            ProgramSelection::Unique => match candidates.len() {
                0 => Ok(None),
                1 => Ok(Some(dir.join(&candidates[0]))),
                _ => {
                    let mut candidates: Vec<_> = candidates
                        .iter()
                        .map(|s| s.to_string_lossy().into_owned())
                        .collect();
                    candidates.sort();
                    Err(Error::Ambiguous {
                        dir: dir.to_owned(),
                        candidates,
                    })
                }
            },
        }
    }
}

/// Treats every immediate subdirectory of `root` as a submission, sorted by id.
pub fn discover(root: impl AsRef<Path>, finder: &ProgramFinder) -> Result<Vec<Submission>> {
    let mut submissions = Vec::new();
    for dir in fsutil::list_subdirs(&root)? {
        let Some(id) = dir.file_name().map(|s| s.to_string_lossy().into_owned()) else {
            continue
        };
        let program = finder.find_in(&dir)?;
        if program.is_none() {
            log::warn!(
                "{}: no file matches '{}', every test counts as failed",
                id,
                finder.pattern()
            );
        }
        submissions.push(Submission { id, dir, program });
    }
    log::info!(
        "Discovered {} submissions in {:?}",
        submissions.len(),
        root.as_ref()
    );
    Ok(submissions)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn finder(selection: ProgramSelection) -> ProgramFinder {
        ProgramFinder::new(GlobPattern::parse("*.py").unwrap(), selection)
    }

    fn touch(path: impl AsRef<Path>) {
        let path = path.as_ref();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn every_subdir_is_a_submission() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path().join("bob/main.py"));
        touch(root.path().join("alice/sol.py"));
        fs::create_dir(root.path().join("carol")).unwrap();
        touch(root.path().join("tests.txt"));

        let subs = discover(root.path(), &finder(ProgramSelection::FirstListed)).unwrap();
        let ids: Vec<_> = subs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);

        assert_eq!(subs[0].program, Some(root.path().join("alice/sol.py")));
        assert_eq!(subs[1].program, Some(root.path().join("bob/main.py")));
        assert_eq!(subs[2].program, None);
    }

    #[test]
    fn non_matching_files_leave_no_program() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path().join("dave/README.md"));
        touch(root.path().join("dave/main.pyc"));
        fs::create_dir_all(root.path().join("dave/pkg.py")).unwrap();

        let subs = discover(root.path(), &finder(ProgramSelection::FirstListed)).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].program, None);
    }

    #[test]
    fn first_listed_picks_some_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path().join("b.py"));
        touch(dir.path().join("a.py"));
        touch(dir.path().join("notes.txt"));

        let found = finder(ProgramSelection::FirstListed)
            .find_in(dir.path())
            .unwrap()
            .unwrap();
        assert!(found == dir.path().join("a.py") || found == dir.path().join("b.py"));
    }

    #[test]
    fn lexicographic_picks_smallest_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path().join("zz.py"));
        touch(dir.path().join("main.py"));
        touch(dir.path().join("aa.txt"));

        let found = finder(ProgramSelection::Lexicographic)
            .find_in(dir.path())
            .unwrap();
        assert_eq!(found, Some(dir.path().join("main.py")));
    }

    #[test]
    fn unique_rejects_multiple_matches() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path().join("b.py"));
        touch(dir.path().join("a.py"));

        let err = finder(ProgramSelection::Unique)
            .find_in(dir.path())
            .unwrap_err();
        match err {
            Error::Ambiguous { candidates, .. } => assert_eq!(candidates, vec!["a.py", "b.py"]),
            e => panic!("unexpected error: {:?}", e),
        }
    }

    #[test]
    fn unique_accepts_single_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path().join("only.py"));
        touch(dir.path().join("data.txt"));

        let found = finder(ProgramSelection::Unique).find_in(dir.path()).unwrap();
        assert_eq!(found, Some(dir.path().join("only.py")));
    }

    #[test]
    fn missing_root_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let res = discover(
            root.path().join("nope"),
            &finder(ProgramSelection::FirstListed),
        );
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_submission_dir_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        touch(root.path().join("alice/main.py"));
        let locked = root.path().join("bob");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list the directory anyway.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let res = discover(root.path(), &finder(ProgramSelection::FirstListed));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match res {
            Err(Error::Io(e)) => assert_eq!(e.path(), locked.as_path()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn selection_display_is_kebab_case() {
        assert_eq!(ProgramSelection::FirstListed.to_string(), "first-listed");
        assert_eq!(ProgramSelection::Lexicographic.to_string(), "lexicographic");
    }
}
