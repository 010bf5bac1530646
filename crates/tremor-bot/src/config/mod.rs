//! Configuration loading and resolution.

use std::path::PathBuf;
use std::time::Duration;

use tremor_engine::DEFAULT_REGISTRY_PATH;

use crate::report::ReportConfig;
use crate::scheduler::SchedulerConfig;
use crate::types::{BotError, BotResult};

pub const REGISTRY_ENV: &str = "TREMOR_REGISTRY";
pub const REPORT_DIR_ENV: &str = "TREMOR_REPORT_DIR";
pub const RITUALS_DIR_ENV: &str = "TREMOR_RITUALS_DIR";
pub const JOURNALS_DIR_ENV: &str = "TREMOR_JOURNALS_DIR";
pub const WHISPERS_ENV: &str = "TREMOR_WHISPERS";
pub const WEEKLY_CRON_ENV: &str = "TREMOR_WEEKLY_CRON";
pub const POLL_SECS_ENV: &str = "TREMOR_POLL_SECS";
pub const TOKEN_ENV: &str = "TREMOR_BOT_TOKEN";
pub const LEGACY_TOKEN_ENV: &str = "DISCORD_TOKEN";

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the registry path: explicit flag, then `TREMOR_REGISTRY`, then the default.
pub fn resolve_registry_path(explicit: Option<&str>) -> PathBuf {
    resolve_registry_path_with(explicit, process_env)
}

pub fn resolve_registry_path_with(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Some(env_path) = env(REGISTRY_ENV) {
        return PathBuf::from(env_path);
    }

    PathBuf::from(DEFAULT_REGISTRY_PATH)
}

/// Chat token, preferring `TREMOR_BOT_TOKEN` over `DISCORD_TOKEN`.
pub fn resolve_token() -> Option<String> {
    resolve_token_with(process_env)
}

pub fn resolve_token_with(env: impl Fn(&str) -> Option<String>) -> Option<String> {
    env(TOKEN_ENV).or_else(|| env(LEGACY_TOKEN_ENV))
}

/// Everything the bot needs to start.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub registry_path: PathBuf,
    pub report: ReportConfig,
    pub scheduler: SchedulerConfig,
    pub token: Option<String>,
}

impl BotConfig {
    pub fn from_env(registry: Option<&str>) -> BotResult<Self> {
        Self::from_lookup(registry, process_env)
    }

    pub fn from_lookup(
        registry: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> BotResult<Self> {
        let mut report = ReportConfig::default();
        if let Some(dir) = env(REPORT_DIR_ENV) {
            report.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env(RITUALS_DIR_ENV) {
            report.rituals_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env(JOURNALS_DIR_ENV) {
            report.journals_dir = PathBuf::from(dir);
        }
        if let Some(path) = env(WHISPERS_ENV) {
            report.whispers_path = PathBuf::from(path);
        }

        let mut scheduler = SchedulerConfig::default();
        if let Some(cron) = env(WEEKLY_CRON_ENV) {
            scheduler.weekly_cron = cron;
        }
        if let Some(raw) = env(POLL_SECS_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                BotError::Config(format!("{POLL_SECS_ENV} must be a whole number of seconds, got '{raw}'"))
            })?;
            if secs == 0 {
                return Err(BotError::Config(format!("{POLL_SECS_ENV} must be at least 1")));
            }
            scheduler.poll_interval = Duration::from_secs(secs);
        }

        Ok(Self {
            registry_path: resolve_registry_path_with(registry, &env),
            report,
            scheduler,
            token: resolve_token_with(&env),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_registry_path_precedence() {
        let env = lookup(&[(REGISTRY_ENV, "/var/tremor.json")]);
        assert_eq!(
            resolve_registry_path_with(Some("cli.json"), &env),
            PathBuf::from("cli.json")
        );
        assert_eq!(
            resolve_registry_path_with(None, &env),
            PathBuf::from("/var/tremor.json")
        );
        assert_eq!(
            resolve_registry_path_with(None, lookup(&[])),
            PathBuf::from(DEFAULT_REGISTRY_PATH)
        );
    }

    #[test]
    fn test_token_fallback() {
        assert_eq!(
            resolve_token_with(lookup(&[(LEGACY_TOKEN_ENV, "old")])),
            Some("old".to_string())
        );
        assert_eq!(
            resolve_token_with(lookup(&[(TOKEN_ENV, "new"), (LEGACY_TOKEN_ENV, "old")])),
            Some("new".to_string())
        );
        assert_eq!(resolve_token_with(lookup(&[])), None);
    }

    #[test]
    fn test_config_overrides() {
        let config = BotConfig::from_lookup(
            None,
            lookup(&[
                (REPORT_DIR_ENV, "out"),
                (WEEKLY_CRON_ENV, "0 30 8 * * Mon"),
                (POLL_SECS_ENV, "15"),
            ]),
        )
        .unwrap();
        assert_eq!(config.report.output_dir, PathBuf::from("out"));
        assert_eq!(config.report.rituals_dir, PathBuf::from("rituals"));
        assert_eq!(config.scheduler.weekly_cron, "0 30 8 * * Mon");
        assert_eq!(config.scheduler.poll_interval, Duration::from_secs(15));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_invalid_poll_interval() {
        for raw in ["soon", "0"] {
            let result = BotConfig::from_lookup(None, lookup(&[(POLL_SECS_ENV, raw)]));
            assert!(matches!(result, Err(BotError::Config(_))));
        }
    }
}
