mod bearing;
mod selector;
mod sight;

pub use bearing::{bearing_between, bearing_of, turn_for};
pub use selector::{distance, nearest};
pub use sight::opponent_ahead;

use serde::Serialize;
use tracing::debug;

use crate::arena::OccupancyGrid;
use crate::constants::{DEFAULT_HIGH_SCORING_PERCENTILE, DEFAULT_MAX_THROW_DISTANCE};
use crate::error::ArenaError;
use crate::leaderboard::RankedLeaderboard;
use crate::types::{Action, ArenaSnapshot, Bearing};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineOptions {
    pub max_throw_distance: usize,
    pub high_scoring_percentile: f64,
    /// Rank the snapshot itself when no leaderboard is supplied.
    pub rank_locally: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_throw_distance: DEFAULT_MAX_THROW_DISTANCE,
            high_scoring_percentile: DEFAULT_HIGH_SCORING_PERCENTILE,
            rank_locally: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    Solo,
    ThreatInRange,
    Advance {
        target: String,
        bearing: Bearing,
        high_scorer: bool,
    },
    NoTarget,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub reason: DecisionReason,
}

impl Decision {
    fn new(action: Action, reason: DecisionReason) -> Self {
        Self { action, reason }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    options: EngineOptions,
}

impl DecisionEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Picks this turn's action. Pure with respect to its inputs; `leaderboard`
    /// may be ranked locally or come from the shared cache.
    pub fn decide(
        &self,
        snapshot: &ArenaSnapshot,
        leaderboard: Option<&RankedLeaderboard>,
    ) -> Result<Decision, ArenaError> {
        let grid = OccupancyGrid::build(snapshot)?;
        let me = snapshot
            .me()
            .ok_or_else(|| ArenaError::MissingSelf(snapshot.self_id.clone()))?;
        debug!(x = me.x, y = me.y, facing = %me.facing, "deciding turn");

        if grid.player_count() == 1 {
            debug!("no other players on the board");
            return Ok(Decision::new(Action::TurnRight, DecisionReason::Solo));
        }

        let local;
        let leaderboard = match leaderboard {
            Some(board) => Some(board),
            None if self.options.rank_locally => {
                local = RankedLeaderboard::rank(snapshot.players.values());
                Some(&local)
            }
            None => None,
        };

        let candidates = leaderboard
            .map(|board| board.high_scorers(&me.id, self.options.high_scoring_percentile))
            .filter(|set| {
                let present = selector::any_candidate_present(&grid, me, set);
                if !present {
                    debug!(
                        high_scorers = set.len(),
                        "no high scorer on the board, targeting everyone"
                    );
                }
                present
            });
        let filter = candidates.as_ref();

        if opponent_ahead(&grid, me, self.options.max_throw_distance, filter) {
            debug!(high_scorer = filter.is_some(), "opponent in line of sight, throwing");
            return Ok(Decision::new(Action::Throw, DecisionReason::ThreatInRange));
        }

        let (target, high_scorer) = match nearest(&grid, me, filter) {
            Some(target) => (Some(target), filter.is_some()),
            None => (nearest(&grid, me, None), false),
        };
        let Some(target) = target else {
            debug!("no reachable target, spinning");
            return Ok(Decision::new(Action::TurnRight, DecisionReason::NoTarget));
        };

        let bearing = bearing_of(me, target);
        let action = turn_for(me.facing, bearing);
        debug!(
            target = %target.id,
            target_x = target.x,
            target_y = target.y,
            %bearing,
            %action,
            "moving towards target"
        );
        Ok(Decision::new(
            action,
            DecisionReason::Advance {
                target: target.id.clone(),
                bearing,
                high_scorer,
            },
        ))
    }
}
