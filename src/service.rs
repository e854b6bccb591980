use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::LeaderboardCache;
use crate::engine::{Decision, DecisionEngine};
use crate::error::ArenaError;
use crate::events::TurnPublisher;
use crate::leaderboard_store::{fetch_leaderboard_or_warn, now_ms};
use crate::protocol::{parse_arena_update, to_snapshot};

/// Request-level turn pipeline: decode, broadcast, look up the leaderboard, decide.
#[derive(Clone)]
pub struct TurnService {
    engine: DecisionEngine,
    cache: Arc<dyn LeaderboardCache>,
    publisher: Option<TurnPublisher>,
    leaderboard_max_age_ms: u64,
}

impl TurnService {
    pub fn new(
        engine: DecisionEngine,
        cache: Arc<dyn LeaderboardCache>,
        publisher: Option<TurnPublisher>,
        leaderboard_max_age_ms: u64,
    ) -> Self {
        Self {
            engine,
            cache,
            publisher,
            leaderboard_max_age_ms,
        }
    }

    pub fn handle_turn(&self, raw: &str) -> Result<Decision, ArenaError> {
        let update = parse_arena_update(raw)?;
        let snapshot = to_snapshot(&update)?;
        if let Some(publisher) = &self.publisher {
            publisher.publish_or_warn(&update);
        }

        let leaderboard = fetch_leaderboard_or_warn(
            &*self.cache,
            now_ms(),
            self.leaderboard_max_age_ms,
        );
        let decision = self.engine.decide(&snapshot, leaderboard.as_ref())?;
        debug!(reason = ?decision.reason, "decision reason");
        info!(
            player = %snapshot.self_id,
            action = %decision.action,
            players = snapshot.player_count(),
            leaderboard = leaderboard.is_some(),
            "turn decided"
        );
        Ok(decision)
    }
}
