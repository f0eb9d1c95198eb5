use std::{ffi::OsString, path::PathBuf};

use anyhow::Context as _;
use batchjudge_core::testing::ExecError;

pub fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("Failed to get current dir")
}

/// Options whose next argument is a value, never a flag.
const VALUE_OPTIONS: &[&str] = &[
    "-t",
    "--tests",
    "-a",
    "--answers",
    "-C",
    "--dir",
    "-i",
    "--interpreter",
    "-p",
    "--pattern",
    "--select",
    "-j",
    "--jobs",
    "--time-limit",
    "--config",
];

/// Maps the multi-letter single-dash flags `-pr` and `-af` to their long forms,
/// since clap only accepts one letter after a single dash.
///
/// Values of options (`-t -af`) and everything after `--` are left alone.
pub fn rewrite_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    let mut expects_value = false;
    args.into_iter()
        .map(|arg| {
            if after_separator || std::mem::take(&mut expects_value) {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    after_separator = true;
                    arg
                }
                Some("-pr") | Some("--pr") => "--pass-rate".into(),
                Some("-af") | Some("--af") => "--all-failed".into(),
                Some(opt) => {
                    expects_value = VALUE_OPTIONS.contains(&opt);
                    arg
                }
                None => arg,
            }
        })
        .collect()
}

/// Captured stderr of the candidate program whose failure aborted the run, if any.
pub fn failing_program_stderr(err: &anyhow::Error) -> Option<&str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ExecError>())
        .and_then(ExecError::stderr)
}

#[cfg(test)]
mod test {
    use std::io;

    use anyhow::Context as _;
    use batchjudge_core::grading;

    use super::*;

    fn rewrite(args: &[&str]) -> Vec<String> {
        rewrite_legacy_flags(args.iter().map(OsString::from))
            .into_iter()
            .map(|s| s.into_string().unwrap())
            .collect()
    }

    #[test]
    fn legacy_flags_become_long_flags() {
        assert_eq!(
            rewrite(&["batchjudge", "-v", "-pr", "--af", "-t", "x.txt"]),
            vec!["batchjudge", "-v", "--pass-rate", "--all-failed", "-t", "x.txt"]
        );
    }

    #[test]
    fn other_args_are_untouched() {
        assert_eq!(
            rewrite(&["batchjudge", "-p", "*.py", "-prx", "--", "-af"]),
            vec!["batchjudge", "-p", "*.py", "-prx", "--", "-af"]
        );
    }

    #[test]
    fn option_values_are_untouched() {
        assert_eq!(
            rewrite(&["batchjudge", "-t", "-af", "--answers", "-pr", "-af"]),
            vec!["batchjudge", "-t", "-af", "--answers", "-pr", "--all-failed"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn stderr_of_crashed_program_is_found_through_context() {
        use std::os::unix::process::ExitStatusExt;

        let err = grading::Error::Execution {
            submission: "crashy".into(),
            test_no: 2,
            source: ExecError::Crashed {
                program: "crashy/main.py".into(),
                status: std::process::ExitStatus::from_raw(1 << 8),
                stdout: String::new(),
                stderr: "boom\n".into(),
            },
        };
        let err = Err::<(), _>(err).context("Cannot grade").unwrap_err();

        assert_eq!(failing_program_stderr(&err), Some("boom\n"));
    }

    #[test]
    fn spawn_failure_has_no_program_stderr() {
        let err = anyhow::Error::from(grading::Error::Execution {
            submission: "alice".into(),
            test_no: 1,
            source: ExecError::Spawn {
                interpreter: "no-such-python".into(),
                program: "alice/main.py".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            },
        });

        assert_eq!(failing_program_stderr(&err), None);
    }
}
