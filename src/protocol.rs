use std::collections::BTreeMap;

use crate::constants::MAX_ARENA_CELLS;
use crate::error::ArenaError;
use crate::types::{ArenaSnapshot, ArenaUpdate, Player};

pub fn parse_arena_update(raw: &str) -> Result<ArenaUpdate, ArenaError> {
    Ok(serde_json::from_str(raw)?)
}

/// Validates a decoded request into a snapshot the engine can trust.
pub fn to_snapshot(update: &ArenaUpdate) -> Result<ArenaSnapshot, ArenaError> {
    let dims = &update.arena.dims;
    if dims.len() != 2 {
        return Err(ArenaError::DimsLength(dims.len()));
    }
    let (raw_width, raw_height) = (dims[0], dims[1]);
    if raw_width <= 0 || raw_height <= 0 {
        return Err(ArenaError::EmptyArena {
            width: raw_width,
            height: raw_height,
        });
    }
    let fits = raw_width
        .checked_mul(raw_height)
        .is_some_and(|cells| cells <= MAX_ARENA_CELLS as i64);
    if !fits {
        return Err(ArenaError::ArenaTooLarge {
            width: raw_width,
            height: raw_height,
            max_cells: MAX_ARENA_CELLS,
        });
    }
    let (Ok(width), Ok(height)) = (usize::try_from(raw_width), usize::try_from(raw_height)) else {
        return Err(ArenaError::EmptyArena {
            width: raw_width,
            height: raw_height,
        });
    };

    let self_id = update.links.self_link.href.clone();
    if !update.arena.state.contains_key(&self_id) {
        return Err(ArenaError::MissingSelf(self_id));
    }

    let mut players = BTreeMap::new();
    for (id, state) in &update.arena.state {
        let inside = state.x >= 0
            && state.y >= 0
            && (state.x as usize) < width
            && (state.y as usize) < height;
        if !inside {
            return Err(ArenaError::OutOfBounds {
                id: id.clone(),
                x: state.x,
                y: state.y,
                width,
                height,
            });
        }
        players.insert(id.clone(), Player::from_state(id, state));
    }

    Ok(ArenaSnapshot {
        width,
        height,
        self_id,
        players,
    })
}

pub fn parse_snapshot(raw: &str) -> Result<ArenaSnapshot, ArenaError> {
    to_snapshot(&parse_arena_update(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Facing;

    const TURN: &str = r#"{
  "_links": { "self": { "href": "https://bot-a.example" } },
  "arena": {
    "dims": [4, 3],
    "state": {
      "https://bot-a.example": { "x": 0, "y": 0, "direction": "E", "wasHit": false, "score": 5 },
      "https://bot-b.example": { "x": 3, "y": 2, "direction": "N", "wasHit": true, "score": -1 }
    }
  }
}"#;

    #[test]
    fn parse_turn_request() {
        let snapshot = parse_snapshot(TURN).expect("turn should parse");
        assert_eq!(snapshot.width, 4);
        assert_eq!(snapshot.height, 3);
        assert_eq!(snapshot.player_count(), 2);
        let me = snapshot.me().expect("self exists");
        assert_eq!(me.facing, Facing::E);
        assert_eq!(me.score, 5);
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let raw = TURN.replacen("\"arena\"", "\"extra\": 1, \"arena\"", 1);
        assert!(matches!(parse_snapshot(&raw), Err(ArenaError::Decode(_))));
    }

    #[test]
    fn unknown_player_field_is_rejected() {
        let raw = TURN.replacen("\"score\": 5", "\"score\": 5, \"team\": \"red\"", 1);
        assert!(matches!(parse_snapshot(&raw), Err(ArenaError::Decode(_))));
    }

    #[test]
    fn invalid_direction_is_rejected() {
        let raw = TURN.replacen("\"direction\": \"E\"", "\"direction\": \"NE\"", 1);
        assert!(matches!(parse_snapshot(&raw), Err(ArenaError::Decode(_))));
    }

    #[test]
    fn missing_self_is_rejected() {
        let raw = TURN.replacen("https://bot-a.example\" }", "https://bot-z.example\" }", 1);
        assert!(matches!(
            parse_snapshot(&raw),
            Err(ArenaError::MissingSelf(id)) if id == "https://bot-z.example"
        ));
    }

    #[test]
    fn out_of_bounds_player_is_rejected() {
        let raw = TURN.replacen("\"x\": 3, \"y\": 2", "\"x\": 4, \"y\": 2", 1);
        assert!(matches!(
            parse_snapshot(&raw),
            Err(ArenaError::OutOfBounds { x: 4, .. })
        ));

        let raw = TURN.replacen("\"x\": 3, \"y\": 2", "\"x\": 1, \"y\": -1", 1);
        assert!(matches!(
            parse_snapshot(&raw),
            Err(ArenaError::OutOfBounds { y: -1, .. })
        ));
    }

    #[test]
    fn bad_dims_are_rejected() {
        let raw = TURN.replacen("[4, 3]", "[4]", 1);
        assert!(matches!(parse_snapshot(&raw), Err(ArenaError::DimsLength(1))));

        let raw = TURN.replacen("[4, 3]", "[0, 3]", 1);
        assert!(matches!(
            parse_snapshot(&raw),
            Err(ArenaError::EmptyArena { width: 0, .. })
        ));
    }

    #[test]
    fn oversized_dims_are_rejected_before_allocating() {
        for dims in [
            "[4294967296, 4294967296]",
            "[100000, 100000]",
            "[9223372036854775807, 2]",
        ] {
            let raw = TURN.replacen("[4, 3]", dims, 1);
            assert!(
                matches!(parse_snapshot(&raw), Err(ArenaError::ArenaTooLarge { .. })),
                "{dims}"
            );
        }

        let raw = TURN.replacen("[4, 3]", "[1024, 1024]", 1);
        assert!(parse_snapshot(&raw).is_ok());
    }
}
