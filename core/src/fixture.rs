use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unequal amount of tests and answers: {tests} tests in '{}', {answers} answers in '{}'", .tests_path.to_string_lossy(), .answers_path.to_string_lossy())]
    Mismatch {
        tests: usize,
        answers: usize,
        tests_path: PathBuf,
        answers_path: PathBuf,
    },

    #[error("Cannot load fixture: {0}")]
    Unreadable(#[from] fsutil::Error),
}

/// One test input together with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// 1-based position in the test file.
    pub no: usize,
    pub input: String,
    pub expected: String,
}

/// The line-aligned tests and answers. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSet {
    fixtures: Vec<Fixture>,
}

impl FixtureSet {
    pub fn load(tests_path: impl AsRef<Path>, answers_path: impl AsRef<Path>) -> Result<Self> {
        let (tests_path, answers_path) = (tests_path.as_ref(), answers_path.as_ref());
        let inputs = fsutil::read_lines(tests_path)?;
        let expecteds = fsutil::read_lines(answers_path)?;

        if inputs.len() != expecteds.len() {
            return Err(Error::Mismatch {
                tests: inputs.len(),
                answers: expecteds.len(),
                tests_path: tests_path.to_owned(),
                answers_path: answers_path.to_owned(),
            });
        }

        let set = Self::from_pairs(inputs.into_iter().zip(expecteds));
        log::info!(
            "Loaded {} tests from {:?} (answers: {:?})",
            set.len(),
            tests_path,
            answers_path
        );
        Ok(set)
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let fixtures = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (input, expected))| Fixture {
                no: i + 1,
                input: input.into(),
                expected: expected.into(),
            })
            .collect();
        Self { fixtures }
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fixture> {
        self.fixtures.iter()
    }

    /// Looks up a fixture by its 1-based number.
    pub fn get(&self, no: usize) -> Option<&Fixture> {
        no.checked_sub(1).and_then(|i| self.fixtures.get(i))
    }
}

impl<'a> IntoIterator for &'a FixtureSet {
    type Item = &'a Fixture;
    type IntoIter = std::slice::Iter<'a, Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
