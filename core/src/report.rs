use std::io::{self, Write};

use colored::Colorize;
use serde::Deserialize;

use crate::scoring::{FailureRecord, Scoreboard};
use crate::style;

/// Which optional sections to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub verbose: bool,
    pub pass_rate: bool,
    pub all_failed: bool,
}

/// Writes the report in its fixed order: failure details, scores, pass rates, unsuccessful tests.
pub fn write_report<W: Write>(w: &mut W, board: &Scoreboard, opts: &ReportOptions) -> io::Result<()> {
    if opts.verbose {
        for f in board.failures() {
            write_failure(w, f)?;
        }
    }
    write_scores(w, board)?;
    if opts.pass_rate {
        write_pass_rates(w, board)?;
    }
    if opts.all_failed {
        write_all_failed(w, board)?;
    }
    Ok(())
}

pub fn write_failure<W: Write>(w: &mut W, f: &FailureRecord) -> io::Result<()> {
    writeln!(
        w,
        "{} failed: test {} ({})",
        f.submission.bold(),
        f.test_no,
        style::verdict_label(f.verdict)
    )?;
    writeln!(w, "\texpected response: {}", f.expected)?;
    match &f.actual {
        Some(actual) => writeln!(w, "\tresponse: {}", actual)?,
        None => writeln!(w, "\tresponse: {}", "<none>".dimmed())?,
    }
    if let Some(line) = f.stderr.as_deref().and_then(|s| s.lines().next()) {
        writeln!(w, "\tstderr: {}", line.bright_red())?;
    }
    writeln!(w)
}

pub fn write_scores<W: Write>(w: &mut W, board: &Scoreboard) -> io::Result<()> {
    for (id, _) in board.scores() {
        let pct = board.percentage_of(id).unwrap_or_default();
        writeln!(w, "{} {}%", id, pct)?;
    }
    Ok(())
}

pub fn write_pass_rates<W: Write>(w: &mut W, board: &Scoreboard) -> io::Result<()> {
    writeln!(w, "pass rates:")?;
    for (no, pct) in board.pass_rates() {
        writeln!(w, "\t {} {}%", no, pct)?;
    }
    Ok(())
}

pub fn write_all_failed<W: Write>(w: &mut W, board: &Scoreboard) -> io::Result<()> {
    writeln!(w, "unsuccessful tests:")?;
    for no in board.all_failed_tests() {
        writeln!(w, "\t {}", no)?;
    }
    Ok(())
}
