use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_TRACKED_PLAYERS;

/// Destination for per-player score samples, tagged by player identity.
pub trait ScoreSink: Send + Sync {
    fn record(&self, player_id: &str, score: i64);
}

/// Emits each sample as a `score_history` tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingScoreSink;

impl ScoreSink for TracingScoreSink {
    fn record(&self, player_id: &str, score: i64) {
        info!(target: "score_history", bot_id = %player_id, score, "score sample");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreSample {
    #[serde(rename = "botId")]
    pub bot_id: String,
    pub score: i64,
    pub samples: u64,
}

#[derive(Debug)]
struct Tracked {
    score: i64,
    samples: u64,
    last_seen: u64,
}

#[derive(Debug, Default)]
struct ScoreTable {
    players: BTreeMap<String, Tracked>,
    tick: u64,
}

/// Keeps the last recorded score per player, for at most `capacity` players.
/// Recording a new player into a full table evicts the one heard from least
/// recently.
#[derive(Debug)]
pub struct LastValueScoreSink {
    capacity: usize,
    values: Mutex<ScoreTable>,
}

impl Default for LastValueScoreSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACKED_PLAYERS)
    }
}

impl LastValueScoreSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            values: Mutex::new(ScoreTable::default()),
        }
    }

    pub fn snapshot(&self) -> Vec<ScoreSample> {
        let Ok(guard) = self.values.lock() else {
            warn!("score sink lock poisoned");
            return Vec::new();
        };
        guard
            .players
            .iter()
            .map(|(bot_id, tracked)| ScoreSample {
                bot_id: bot_id.clone(),
                score: tracked.score,
                samples: tracked.samples,
            })
            .collect()
    }
}

impl ScoreSink for LastValueScoreSink {
    fn record(&self, player_id: &str, score: i64) {
        let Ok(mut guard) = self.values.lock() else {
            warn!("score sink lock poisoned");
            return;
        };
        let table = &mut *guard;
        table.tick += 1;
        if !table.players.contains_key(player_id) && table.players.len() >= self.capacity {
            let oldest = table
                .players
                .iter()
                .min_by_key(|(_, tracked)| tracked.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!(evicted = %oldest, "score table full");
                table.players.remove(&oldest);
            }
        }
        let tracked = table
            .players
            .entry(player_id.to_string())
            .or_insert(Tracked {
                score,
                samples: 0,
                last_seen: 0,
            });
        tracked.score = score;
        tracked.samples += 1;
        tracked.last_seen = table.tick;
    }
}

/// Forwards every sample to each inner sink.
pub struct FanoutScoreSink {
    sinks: Vec<Arc<dyn ScoreSink>>,
}

impl FanoutScoreSink {
    pub fn new(sinks: Vec<Arc<dyn ScoreSink>>) -> Self {
        Self { sinks }
    }
}

impl ScoreSink for FanoutScoreSink {
    fn record(&self, player_id: &str, score: i64) {
        for sink in &self.sinks {
            sink.record(player_id, score);
        }
    }
}
