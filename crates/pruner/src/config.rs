use std::str::FromStr;
use std::time::Duration;

use crate::delete::DEFAULT_DELETE_TIMEOUT;

/// Default wait after rules are cleared before a version is deletable.
/// Only used where the host does not provide its own value.
pub const DEFAULT_RULE_DELETE_WAIT_DAYS: i64 = 7;

/// Pruner configuration loaded from environment variables.
///
/// All fields have defaults matching the admin UI's behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunerConfig {
    /// How long to wait for the host to confirm each delete.
    pub delete_timeout: Duration,
    /// Wait period in days for the offline preview, which has no host to
    /// ask.
    pub rule_delete_wait_days: i64,
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self {
            delete_timeout: DEFAULT_DELETE_TIMEOUT,
            rule_delete_wait_days: DEFAULT_RULE_DELETE_WAIT_DAYS,
        }
    }
}

impl PrunerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `APPREL_DELETE_TIMEOUT_MS`     | `30000` |
    /// | `APPREL_RULE_DELETE_WAIT_DAYS` | `7`     |
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_ms = parse_var(
            "APPREL_DELETE_TIMEOUT_MS",
            lookup("APPREL_DELETE_TIMEOUT_MS"),
            defaults.delete_timeout.as_millis() as u64,
        );
        let rule_delete_wait_days = parse_var(
            "APPREL_RULE_DELETE_WAIT_DAYS",
            lookup("APPREL_RULE_DELETE_WAIT_DAYS"),
            defaults.rule_delete_wait_days,
        );

        Self {
            delete_timeout: Duration::from_millis(timeout_ms),
            rule_delete_wait_days,
        }
    }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(var = name, value = %raw, error = %e, "Invalid config value, using default");
            default
        }
    }
}
