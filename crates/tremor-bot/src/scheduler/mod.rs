//! Background scheduler for recurring jobs.

pub mod job;

pub use job::{JobKind, JobRunner, ScheduledJob};

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::report::ReportConfig;
use crate::types::{BotError, BotResult};
use crate::SharedEngine;

/// Default weekly cron: Sunday 09:00 local time.
pub const DEFAULT_WEEKLY_CRON: &str = "0 0 9 * * Sun";

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    pub join_timeout: Duration,
    pub weekly_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            join_timeout: Duration::from_secs(5),
            weekly_cron: DEFAULT_WEEKLY_CRON.to_string(),
        }
    }
}

/// Snapshot returned by [`TremorScheduler::status`].
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub jobs_count: usize,
    pub next_run: Option<DateTime<Local>>,
    pub jobs: Vec<String>,
}

/// Polls job schedules on a background task.
pub struct TremorScheduler {
    config: SchedulerConfig,
    jobs: Arc<Vec<ScheduledJob>>,
    runner: Arc<JobRunner>,
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TremorScheduler {
    pub fn new(
        config: SchedulerConfig,
        engine: SharedEngine,
        report: ReportConfig,
    ) -> BotResult<Self> {
        let jobs = vec![ScheduledJob::new(
            JobKind::WeeklyTremors,
            &config.weekly_cron,
        )?];

        tracing::info!(
            weekly = %config.weekly_cron,
            poll_secs = config.poll_interval.as_secs_f64(),
            "Scheduler configured"
        );

        Ok(Self {
            config,
            jobs: Arc::new(jobs),
            runner: Arc::new(JobRunner::new(engine, report)),
            running: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the polling loop. A second call while running is a no-op.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Scheduler is already running");
            return;
        }

        let jobs = Arc::clone(&self.jobs);
        let runner = Arc::clone(&self.runner);
        let running = Arc::clone(&self.running);
        let wake = Arc::clone(&self.wake);
        let poll = self.config.poll_interval;

        let handle = tokio::spawn(async move {
            tracing::info!("Scheduler started");
            let mut last_check = Local::now();

            while running.load(Ordering::SeqCst) {
                tokio::select! {
                    _ = tokio::time::sleep(poll) => {}
                    _ = wake.notified() => {}
                }
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let now = Local::now();
                for job in jobs.iter() {
                    if job.is_due(&last_check, &now) {
                        if let Err(e) = runner.run(job.kind).await {
                            tracing::error!(job = job.kind.name(), "Job failed: {e}");
                        }
                    }
                }
                last_check = now;
            }

            tracing::info!("Scheduler stopped");
        });

        *self.handle.lock().await = Some(handle);
    }

    /// Stop the loop, waiting up to the join timeout before aborting it.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.wake.notify_one();

        let handle = self.handle.lock().await.take();
        if let Some(mut handle) = handle {
            if tokio::time::timeout(self.config.join_timeout, &mut handle)
                .await
                .is_err()
            {
                tracing::warn!("Scheduler did not stop in time, aborting");
                handle.abort();
            }
        }
        tracing::info!("Scheduler shutdown complete");
    }

    pub fn status(&self) -> SchedulerStatus {
        let now = Local::now();
        SchedulerStatus {
            running: self.is_running(),
            jobs_count: self.jobs.len(),
            next_run: self.jobs.iter().filter_map(|j| j.next_after(&now)).min(),
            jobs: self.jobs.iter().map(|j| j.describe(&now)).collect(),
        }
    }

    /// Run a named job immediately, outside the schedule.
    pub async fn run_now(&self, job_name: &str) -> BotResult<PathBuf> {
        let kind =
            JobKind::from_name(job_name).ok_or_else(|| BotError::UnknownJob(job_name.to_string()))?;
        self.runner.run(kind).await
    }
}
