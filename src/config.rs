use std::env;
use std::path::PathBuf;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::constants::{
    DEFAULT_EVENT_QUEUE_CAPACITY, DEFAULT_HIGH_SCORING_PERCENTILE,
    DEFAULT_LEADERBOARD_MAX_AGE_MS, DEFAULT_MAX_THROW_DISTANCE, DEFAULT_PORT,
};
use crate::engine::EngineOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct BotConfig {
    pub port: u16,
    pub engine: EngineOptions,
    /// `None` keeps the leaderboard in process memory.
    pub leaderboard_dir: Option<PathBuf>,
    pub leaderboard_max_age_ms: u64,
    pub event_queue_capacity: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            engine: EngineOptions::default(),
            leaderboard_dir: None,
            leaderboard_max_age_ms: DEFAULT_LEADERBOARD_MAX_AGE_MS,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let percentile = read_f64(&lookup, "HIGH_SCORING_PERCENTILE")
            .unwrap_or(DEFAULT_HIGH_SCORING_PERCENTILE);
        let high_scoring_percentile = if percentile > 0.0 && percentile <= 1.0 {
            percentile
        } else {
            warn!(
                "HIGH_SCORING_PERCENTILE ({}) must be in (0, 1]. Falling back to {}.",
                percentile, DEFAULT_HIGH_SCORING_PERCENTILE
            );
            DEFAULT_HIGH_SCORING_PERCENTILE
        };

        Self {
            port: read_parsed(&lookup, "PORT")
                .filter(|port: &u16| *port > 0)
                .unwrap_or(DEFAULT_PORT),
            engine: EngineOptions {
                max_throw_distance: read_parsed(&lookup, "MAX_THROW_DISTANCE")
                    .unwrap_or(DEFAULT_MAX_THROW_DISTANCE),
                high_scoring_percentile,
                rank_locally: read_bool(&lookup, "RANK_LOCALLY", false),
            },
            leaderboard_dir: lookup("LEADERBOARD_DIR")
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from),
            leaderboard_max_age_ms: read_parsed(&lookup, "LEADERBOARD_MAX_AGE_MS")
                .unwrap_or(DEFAULT_LEADERBOARD_MAX_AGE_MS),
            event_queue_capacity: read_parsed(&lookup, "EVENT_QUEUE_CAPACITY")
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_QUEUE_CAPACITY),
        }
    }
}

/// Log filter from `RUST_LOG` directives, or `default_level` when unset or empty.
pub fn log_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

fn read_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    lookup(name).and_then(|value| value.trim().parse::<T>().ok())
}

fn read_f64(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<f64> {
    read_parsed::<f64>(lookup, name).filter(|value| value.is_finite())
}

fn read_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    match lookup(name).map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if matches!(value.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(value) if matches!(value.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
