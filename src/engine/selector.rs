use crate::arena::OccupancyGrid;
use crate::leaderboard::CandidateSet;
use crate::types::Player;

pub fn distance((ax, ay): (i32, i32), (bx, by): (i32, i32)) -> f64 {
    let dx = f64::from(bx - ax);
    let dy = f64::from(by - ay);
    (dx * dx + dy * dy).sqrt()
}

/// Closest occupant other than `me`, optionally restricted to `candidates`.
///
/// Cells are visited in the grid's scan order (x ascending, then y ascending) and
/// only a strictly shorter distance replaces the current best, so the first
/// minimal cell in that order wins ties.
pub fn nearest<'a>(
    grid: &OccupancyGrid<'a>,
    me: &Player,
    candidates: Option<&CandidateSet>,
) -> Option<&'a Player> {
    let origin = me.position();
    let mut best: Option<(f64, &'a Player)> = None;
    for (x, y, occupant) in grid.occupied_cells() {
        if (x, y) == origin {
            continue;
        }
        if let Some(set) = candidates {
            if !set.contains(&occupant.id) {
                continue;
            }
        }
        let current = distance(origin, (x, y));
        match best {
            Some((closest, _)) if current >= closest => {}
            _ => best = Some((current, occupant)),
        }
    }
    best.map(|(_, player)| player)
}

/// Whether any candidate occupies a cell of the grid at all, ignoring `me`'s cell.
pub fn any_candidate_present(
    grid: &OccupancyGrid<'_>,
    me: &Player,
    candidates: &CandidateSet,
) -> bool {
    grid.occupied_cells()
        .any(|(x, y, occupant)| (x, y) != me.position() && candidates.contains(&occupant.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::tests::make_snapshot;
    use crate::types::Facing;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance((0, 0), (3, 4)), 5.0);
        assert_eq!(distance((2, 2), (2, 2)), 0.0);
    }

    #[test]
    fn nearest_picks_closest_occupant() {
        let snapshot = make_snapshot(
            6,
            6,
            "me",
            vec![
                ("me", 2, 2, Facing::N, 0),
                ("far", 5, 5, Facing::N, 0),
                ("near", 3, 3, Facing::N, 0),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        let target = nearest(&grid, me, None).expect("target exists");
        assert_eq!(target.id, "near");
    }

    #[test]
    fn nearest_prefers_euclidean_over_manhattan() {
        // (4,4) is 2.83 away but manhattan 4; (2,5) is 3 away and manhattan 3.
        let snapshot = make_snapshot(
            8,
            8,
            "me",
            vec![
                ("me", 2, 2, Facing::N, 0),
                ("diag", 4, 4, Facing::N, 0),
                ("line", 2, 5, Facing::N, 0),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        assert_eq!(nearest(&grid, me, None).map(|p| p.id.as_str()), Some("diag"));
    }

    #[test]
    fn nearest_respects_candidate_set() {
        let snapshot = make_snapshot(
            5,
            5,
            "me",
            vec![
                ("me", 0, 0, Facing::E, 50),
                ("low", 1, 0, Facing::N, 10),
                ("top", 4, 4, Facing::N, 90),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        let set: CandidateSet = ["top"].into_iter().collect();
        assert_eq!(
            nearest(&grid, me, Some(&set)).map(|p| p.id.as_str()),
            Some("top")
        );
    }

    #[test]
    fn nearest_is_none_for_solo_or_empty_set() {
        let snapshot = make_snapshot(3, 3, "me", vec![("me", 1, 1, Facing::N, 0)]);
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        assert!(nearest(&grid, me, None).is_none());

        let snapshot = make_snapshot(
            3,
            3,
            "me",
            vec![("me", 1, 1, Facing::N, 0), ("b", 0, 0, Facing::N, 0)],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        let empty = CandidateSet::default();
        assert!(nearest(&grid, me, Some(&empty)).is_none());
        assert!(!any_candidate_present(&grid, me, &empty));
    }

    #[test]
    fn nearest_is_stable_across_calls() {
        let snapshot = make_snapshot(
            5,
            5,
            "me",
            vec![
                ("me", 2, 2, Facing::N, 0),
                ("b", 2, 0, Facing::N, 0),
                ("c", 0, 2, Facing::N, 0),
                ("d", 4, 2, Facing::N, 0),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let me = snapshot.me().expect("self exists");
        let first = nearest(&grid, me, None).map(|p| p.id.clone());
        let second = nearest(&grid, me, None).map(|p| p.id.clone());
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
