//! Scheduled jobs and the runner that executes them.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use cron::Schedule;

use crate::report::{write_current_report, ReportConfig};
use crate::types::{BotError, BotResult};
use crate::{run_blocking, SharedEngine};

/// Jobs the scheduler knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    WeeklyTremors,
}

impl JobKind {
    pub const ALL: [JobKind; 1] = [JobKind::WeeklyTremors];

    pub fn name(&self) -> &'static str {
        match self {
            Self::WeeklyTremors => "weekly_tremors",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A job bound to a cron expression.
pub struct ScheduledJob {
    pub kind: JobKind,
    pub expression: String,
    schedule: Schedule,
}

impl ScheduledJob {
    pub fn new(kind: JobKind, expression: &str) -> BotResult<Self> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            BotError::Scheduler(format!("Invalid cron for {}: {expression}: {e}", kind.name()))
        })?;
        Ok(Self {
            kind,
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn next_after(&self, after: &DateTime<Local>) -> Option<DateTime<Local>> {
        self.schedule.after(after).next()
    }

    /// True when a scheduled instant lies in `(last_check, now]`.
    pub fn is_due(&self, last_check: &DateTime<Local>, now: &DateTime<Local>) -> bool {
        self.next_after(last_check).is_some_and(|next| next <= *now)
    }

    pub fn describe(&self, now: &DateTime<Local>) -> String {
        match self.next_after(now) {
            Some(next) => format!(
                "{} [{}] next run {}",
                self.kind.name(),
                self.expression,
                next.format("%Y-%m-%d %H:%M:%S")
            ),
            None => format!("{} [{}] no upcoming run", self.kind.name(), self.expression),
        }
    }
}

/// Executes jobs against the shared engine.
pub struct JobRunner {
    engine: SharedEngine,
    report: ReportConfig,
}

impl JobRunner {
    pub fn new(engine: SharedEngine, report: ReportConfig) -> Self {
        Self { engine, report }
    }

    /// Run a job and return the path of what it wrote.
    pub async fn run(&self, kind: JobKind) -> BotResult<PathBuf> {
        tracing::info!(job = kind.name(), "Starting job");
        match kind {
            JobKind::WeeklyTremors => {
                let report = self.report.clone();
                let path = run_blocking(&self.engine, move |engine| {
                    write_current_report(&report, engine)
                })
                .await?;
                tracing::info!(job = kind.name(), "Job completed: {}", path.display());
                Ok(path)
            }
        }
    }
}
