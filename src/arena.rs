use crate::constants::MAX_ARENA_CELLS;
use crate::error::ArenaError;
use crate::types::{ArenaSnapshot, Player};

/// Per-turn occupancy of the arena. Cells borrow their occupant from the snapshot.
#[derive(Clone, Debug)]
pub struct OccupancyGrid<'a> {
    width: usize,
    height: usize,
    cells: Vec<Option<&'a Player>>,
    player_count: usize,
}

impl<'a> OccupancyGrid<'a> {
    /// Players are placed in ascending identity order, so when two share a cell
    /// the greater identity ends up as the occupant.
    pub fn build(snapshot: &'a ArenaSnapshot) -> Result<Self, ArenaError> {
        let (width, height) = (snapshot.width, snapshot.height);
        let Some(area) = width
            .checked_mul(height)
            .filter(|area| *area <= MAX_ARENA_CELLS)
        else {
            return Err(ArenaError::ArenaTooLarge {
                width: i64::try_from(width).unwrap_or(i64::MAX),
                height: i64::try_from(height).unwrap_or(i64::MAX),
                max_cells: MAX_ARENA_CELLS,
            });
        };
        let mut cells = vec![None; area];
        for player in snapshot.players.values() {
            let Some(index) = cell_index(width, height, player.x, player.y) else {
                return Err(ArenaError::OutOfBounds {
                    id: player.id.clone(),
                    x: player.x,
                    y: player.y,
                    width,
                    height,
                });
            };
            cells[index] = Some(player);
        }
        Ok(Self {
            width,
            height,
            cells,
            player_count: snapshot.player_count(),
        })
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        cell_index(self.width, self.height, x, y).is_some()
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.occupant(x, y).is_some()
    }

    pub fn occupant(&self, x: i32, y: i32) -> Option<&'a Player> {
        let index = cell_index(self.width, self.height, x, y)?;
        self.cells[index]
    }

    /// Occupied cells in scan order: x ascending, then y ascending.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, &'a Player)> + '_ {
        (0..self.width).flat_map(move |x| {
            (0..self.height).filter_map(move |y| {
                self.cells[y * self.width + x].map(|player| (x as i32, y as i32, player))
            })
        })
    }
}

fn cell_index(width: usize, height: usize, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(y * width + x)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::Facing;

    pub(crate) fn make_snapshot(
        width: usize,
        height: usize,
        self_id: &str,
        rows: Vec<(&str, i32, i32, Facing, i64)>,
    ) -> ArenaSnapshot {
        let players: BTreeMap<String, Player> = rows
            .into_iter()
            .map(|(id, x, y, facing, score)| {
                (
                    id.to_string(),
                    Player {
                        id: id.to_string(),
                        x,
                        y,
                        facing,
                        score,
                    },
                )
            })
            .collect();
        ArenaSnapshot {
            width,
            height,
            self_id: self_id.to_string(),
            players,
        }
    }

    #[test]
    fn build_marks_every_player_cell() {
        let snapshot = make_snapshot(
            3,
            2,
            "a",
            vec![("a", 0, 0, Facing::N, 0), ("b", 2, 1, Facing::S, 0)],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        assert!(grid.is_occupied(0, 0));
        assert!(grid.is_occupied(2, 1));
        assert!(!grid.is_occupied(1, 1));
        assert_eq!(grid.occupant(2, 1).map(|p| p.id.as_str()), Some("b"));
        assert_eq!(grid.player_count(), 2);
    }

    #[test]
    fn out_of_bounds_queries_are_empty() {
        let snapshot = make_snapshot(2, 2, "a", vec![("a", 1, 1, Facing::N, 0)]);
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        assert!(!grid.is_occupied(-1, 0));
        assert!(!grid.is_occupied(2, 0));
        assert!(!grid.is_occupied(0, 2));
        assert!(!grid.in_bounds(0, -1));
    }

    #[test]
    fn build_rejects_player_outside_arena() {
        let snapshot = make_snapshot(
            2,
            2,
            "a",
            vec![("a", 0, 0, Facing::N, 0), ("b", 0, 5, Facing::N, 0)],
        );
        assert!(matches!(
            OccupancyGrid::build(&snapshot),
            Err(ArenaError::OutOfBounds { id, .. }) if id == "b"
        ));
    }

    #[test]
    fn build_rejects_oversized_arena() {
        let snapshot = make_snapshot(usize::MAX, 2, "a", vec![("a", 0, 0, Facing::N, 0)]);
        assert!(matches!(
            OccupancyGrid::build(&snapshot),
            Err(ArenaError::ArenaTooLarge { .. })
        ));
    }

    #[test]
    fn shared_cell_goes_to_greatest_identity() {
        let snapshot = make_snapshot(
            2,
            2,
            "a",
            vec![
                ("c", 1, 1, Facing::N, 0),
                ("a", 0, 0, Facing::N, 0),
                ("b", 1, 1, Facing::N, 0),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        assert_eq!(grid.occupant(1, 1).map(|p| p.id.as_str()), Some("c"));
    }

    #[test]
    fn occupied_cells_scan_x_major() {
        let snapshot = make_snapshot(
            3,
            3,
            "a",
            vec![
                ("a", 2, 0, Facing::N, 0),
                ("b", 0, 2, Facing::N, 0),
                ("c", 0, 1, Facing::N, 0),
            ],
        );
        let grid = OccupancyGrid::build(&snapshot).expect("grid builds");
        let order: Vec<&str> = grid
            .occupied_cells()
            .map(|(_, _, player)| player.id.as_str())
            .collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
