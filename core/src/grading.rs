//! Runs every submission against the fixture set.
//!
//! One task per submission, each running its tests strictly in fixture order.
//! A semaphore bounds how many tasks run at once. Each task returns its own
//! [`SubmissionTally`]; only the coordinator merges them into the
//! [`Scoreboard`], and the board is handed out after every task was joined.

use std::sync::Arc;

use indicatif::ProgressBar;
use serde::Deserialize;
use tokio::sync::{AcquireError, Semaphore};
use tokio::task::{JoinError, JoinSet};

use crate::discovery::Submission;
use crate::fixture::FixtureSet;
use crate::scoring::{Scoreboard, SubmissionTally};
use crate::testing::{ExecError, ProgramRunner};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to grade '{submission}' on test {test_no}")]
    Execution {
        submission: String,
        test_no: usize,
        #[source]
        source: ExecError,
    },

    #[error("Grading task terminated abnormally: {0}")]
    Join(#[from] JoinError),

    #[error("Grading slots are no longer available: {0}")]
    Slots(#[from] AcquireError),
}

/// What to do when a candidate program crashes or overruns its time limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FailurePolicy {
    /// Score the test as failed and keep going.
    #[default]
    Isolate,
    /// Abort the whole run.
    Abort,
}

#[derive(Debug, Clone)]
pub struct Grader {
    runner: Arc<ProgramRunner>,
    fixtures: Arc<FixtureSet>,
    jobs: usize,
    policy: FailurePolicy,
    progress: ProgressBar,
}

impl Grader {
    pub fn new(runner: ProgramRunner, fixtures: FixtureSet) -> Self {
        Self {
            runner: Arc::new(runner),
            fixtures: Arc::new(fixtures),
            jobs: default_jobs(),
            policy: FailurePolicy::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Upper bound of submissions graded at once. Clamped to at least 1.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Progress bar ticked once per finished submission.
    pub fn progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    pub async fn grade(&self, submissions: &[Submission]) -> Result<Scoreboard> {
        let mut board = Scoreboard::new(submissions, self.fixtures.len());
        let permits = Arc::new(Semaphore::new(self.jobs));
        let mut units = JoinSet::new();

        log::info!(
            "Grading {} submissions on {} tests ({} at a time)",
            submissions.len(),
            self.fixtures.len(),
            self.jobs
        );
        self.progress.set_length(submissions.len() as u64);

        for sub in submissions {
            let sub = sub.clone();
            let runner = Arc::clone(&self.runner);
            let fixtures = Arc::clone(&self.fixtures);
            let permits = Arc::clone(&permits);
            let policy = self.policy;
            units.spawn(async move {
                let _permit = permits.acquire_owned().await?;
                grade_submission(&runner, &fixtures, &sub, policy).await
            });
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(tally)) => {
                    self.progress.inc(1);
                    board.merge(tally);
                }
                Ok(Err(e)) => {
                    // Dropping the tasks kills their child processes.
                    units.abort_all();
                    self.progress.abandon();
                    return Err(e);
                }
                Err(e) => {
                    units.abort_all();
                    self.progress.abandon();
                    return Err(e.into());
                }
            }
        }
        self.progress.finish_and_clear();
        Ok(board)
    }
}

pub async fn grade_submission(
    runner: &ProgramRunner,
    fixtures: &FixtureSet,
    sub: &Submission,
    policy: FailurePolicy,
) -> Result<SubmissionTally> {
    let Some(program) = &sub.program else {
        return Ok(SubmissionTally::without_program(&sub.id, fixtures.len()))
    };

    let mut tally = SubmissionTally::new(&sub.id, fixtures.len());
    for fixture in fixtures {
        match runner.run(program, &fixture.input).await {
            Ok(output) => {
                let verdict = tally.record_output(fixture, output.normalized());
                log::debug!(
                    "{}: test {} ... {} [{}ms]",
                    sub.id,
                    fixture.no,
                    verdict,
                    output.execution_time.as_millis()
                );
            }
            Err(e) if policy == FailurePolicy::Isolate && !e.is_environmental() => {
                log::warn!("{}: test {}: {}", sub.id, fixture.no, e);
                tally.record_failure(fixture, e.verdict(), e.stderr());
            }
            Err(e) => {
                return Err(Error::Execution {
                    submission: sub.id.clone(),
                    test_no: fixture.no,
                    source: e,
                })
            }
        }
    }
    Ok(tally)
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
