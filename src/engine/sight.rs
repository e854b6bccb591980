use crate::arena::OccupancyGrid;
use crate::leaderboard::CandidateSet;
use crate::types::Player;

/// Scans up to `max_range` cells ahead of `me` along its facing and reports the
/// first occupied cell that qualifies. The scan stops at the arena edge.
pub fn opponent_ahead(
    grid: &OccupancyGrid<'_>,
    me: &Player,
    max_range: usize,
    candidates: Option<&CandidateSet>,
) -> bool {
    let (dx, dy) = me.facing.step();
    let (mut x, mut y) = me.position();
    for _ in 0..max_range {
        x += dx;
        y += dy;
        if !grid.in_bounds(x, y) {
            return false;
        }
        let Some(occupant) = grid.occupant(x, y) else {
            continue;
        };
        match candidates {
            Some(set) if !set.contains(&occupant.id) => {}
            _ => return true,
        }
    }
    false
}
