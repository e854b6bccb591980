use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    N,
    E,
    S,
    W,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::N, Facing::E, Facing::S, Facing::W];

    /// Unit step `(dx, dy)` in grid coordinates. North decreases y.
    pub fn step(self) -> (i32, i32) {
        match self {
            Self::N => (0, -1),
            Self::E => (1, 0),
            Self::S => (0, 1),
            Self::W => (-1, 0),
        }
    }

    pub fn rotate_right(self) -> Self {
        match self {
            Self::N => Self::E,
            Self::E => Self::S,
            Self::S => Self::W,
            Self::W => Self::N,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::N => "N",
            Self::E => "E",
            Self::S => "S",
            Self::W => "W",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bearing {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Bearing {
    pub const ALL: [Bearing; 8] = [
        Bearing::N,
        Bearing::NE,
        Bearing::E,
        Bearing::SE,
        Bearing::S,
        Bearing::SW,
        Bearing::W,
        Bearing::NW,
    ];

    pub fn opposite(self) -> Self {
        self.rotate_right().rotate_right()
    }

    /// Rotates clockwise by 45 degrees.
    pub fn rotate_eighth(self) -> Self {
        match self {
            Self::N => Self::NE,
            Self::NE => Self::E,
            Self::E => Self::SE,
            Self::SE => Self::S,
            Self::S => Self::SW,
            Self::SW => Self::W,
            Self::W => Self::NW,
            Self::NW => Self::N,
        }
    }

    /// Rotates clockwise by 90 degrees.
    pub fn rotate_right(self) -> Self {
        self.rotate_eighth().rotate_eighth()
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "L")]
    TurnLeft,
    #[serde(rename = "R")]
    TurnRight,
    #[serde(rename = "T")]
    Throw,
}

impl Action {
    pub fn token(self) -> &'static str {
        match self {
            Self::Forward => "F",
            Self::TurnLeft => "L",
            Self::TurnRight => "R",
            Self::Throw => "T",
        }
    }

    pub fn parse_token(value: &str) -> Option<Self> {
        match value {
            "F" => Some(Self::Forward),
            "L" => Some(Self::TurnLeft),
            "R" => Some(Self::TurnRight),
            "T" => Some(Self::Throw),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Per-player entry of the turn request, keyed by identity in `arena.state`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerState {
    pub x: i32,
    pub y: i32,
    pub direction: Facing,
    #[serde(rename = "wasHit", default)]
    pub was_hit: bool,
    pub score: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelfLink {
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: SelfLink,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaState {
    pub dims: Vec<i64>,
    pub state: BTreeMap<String, PlayerState>,
}

/// Raw turn request as posted by the arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaUpdate {
    #[serde(rename = "_links")]
    pub links: Links,
    pub arena: ArenaState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "direction")]
    pub facing: Facing,
    pub score: i64,
}

impl Player {
    pub fn from_state(id: &str, state: &PlayerState) -> Self {
        Self {
            id: id.to_string(),
            x: state.x,
            y: state.y,
            facing: state.direction,
            score: state.score,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Validated view of one turn. Players are held ordered by identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaSnapshot {
    pub width: usize,
    pub height: usize,
    pub self_id: String,
    pub players: BTreeMap<String, Player>,
}

impl ArenaSnapshot {
    pub fn me(&self) -> Option<&Player> {
        self.players.get(&self.self_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
