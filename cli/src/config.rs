use std::path::Path;

use batchjudge_core::Config;

use crate::cmd::Args;

/// Config file values overridden by command line flags.
pub fn resolve(args: &Args, cwd: &Path) -> anyhow::Result<Config> {
    let cfg = match &args.config {
        Some(path) => Config::from_toml_file(cwd.join(path))?,
        None => Config::from_dir_or_default(cwd)?,
    };
    if let Some(path) = &cfg.source_config_file {
        log::info!("Using config {:?}", path);
    }
    Ok(with_args(cfg, args))
}

pub fn with_args(mut cfg: Config, args: &Args) -> Config {
    let Args {
        tests,
        answers,
        verbose,
        pass_rate,
        all_failed,
        submissions_dir,
        interpreter,
        pattern,
        select,
        jobs,
        time_limit,
        abort_on_failure,
        config: _,
        no_color: _,
    } = args;

    if let Some(path) = tests {
        cfg.tests = path.clone();
    }
    if let Some(path) = answers {
        cfg.answers = path.clone();
    }
    if let Some(dir) = submissions_dir {
        cfg.submissions_dir = dir.clone();
    }
    if let Some(interpreter) = interpreter {
        cfg.interpreter = interpreter.clone();
    }
    if let Some(pattern) = pattern {
        cfg.program_pattern = pattern.clone();
    }
    if let Some(select) = *select {
        cfg.program_selection = select.into();
    }
    if let Some(n) = *jobs {
        cfg.jobs = Some(n as usize);
    }
    if let Some(ms) = *time_limit {
        cfg.time_limit_ms = Some(ms);
    }

    cfg.abort_on_failure |= abort_on_failure;
    cfg.report.verbose |= verbose;
    cfg.report.pass_rate |= pass_rate;
    cfg.report.all_failed |= all_failed;
    cfg
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use batchjudge_core::discovery::ProgramSelection;
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("batchjudge").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let cfg = Config::from_toml(
            "tests = \"a.txt\"\ninterpreter = \"pypy3\"\njobs = 8\n[report]\npass_rate = true\n",
        )
        .unwrap();
        let cfg = with_args(cfg, &args(&["-t", "b.txt", "-j", "2", "-v", "--select", "unique"]));

        assert_eq!(cfg.tests, PathBuf::from("b.txt"));
        assert_eq!(cfg.interpreter, PathBuf::from("pypy3"));
        assert_eq!(cfg.jobs, Some(2));
        assert_eq!(cfg.program_selection, ProgramSelection::Unique);
        assert!(cfg.report.verbose);
        assert!(cfg.report.pass_rate);
        assert!(!cfg.report.all_failed);
    }

    #[test]
    fn explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = resolve(&args(&["--config", "nope.toml"]), dir.path());
        assert!(res.is_err());
    }

    #[test]
    fn without_config_file_defaults_apply() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = resolve(&args(&[]), dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
