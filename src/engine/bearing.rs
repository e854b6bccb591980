use crate::types::{Action, Bearing, Facing, Player};

/// Compass bearing from `from` towards `to`. Smaller y is north, smaller x is west.
/// Callers never pass two players on the same cell.
pub fn bearing_of(from: &Player, to: &Player) -> Bearing {
    bearing_between(from.position(), to.position())
}

pub fn bearing_between((fx, fy): (i32, i32), (tx, ty): (i32, i32)) -> Bearing {
    debug_assert!((fx, fy) != (tx, ty), "bearing to own cell is undefined");
    if fx == tx {
        if ty < fy {
            Bearing::N
        } else {
            Bearing::S
        }
    } else if fy == ty {
        if tx < fx {
            Bearing::W
        } else {
            Bearing::E
        }
    } else if ty < fy {
        if tx < fx {
            Bearing::NW
        } else {
            Bearing::NE
        }
    } else if tx < fx {
        Bearing::SW
    } else {
        Bearing::SE
    }
}

/// Turn that brings `facing` closer to `bearing`. Each row is the facing-N row
/// rotated by 90 degrees.
pub fn turn_for(facing: Facing, bearing: Bearing) -> Action {
    use Action::{Forward, TurnLeft, TurnRight};
    use Bearing as B;

    match (facing, bearing) {
        (Facing::N, B::N | B::NE | B::NW) => Forward,
        (Facing::N, B::E | B::SE | B::S) => TurnRight,
        (Facing::N, B::SW | B::W) => TurnLeft,

        (Facing::E, B::E | B::SE | B::NE) => Forward,
        (Facing::E, B::S | B::SW | B::W) => TurnRight,
        (Facing::E, B::NW | B::N) => TurnLeft,

        (Facing::S, B::S | B::SW | B::SE) => Forward,
        (Facing::S, B::W | B::NW | B::N) => TurnRight,
        (Facing::S, B::NE | B::E) => TurnLeft,

        (Facing::W, B::W | B::NW | B::SW) => Forward,
        (Facing::W, B::N | B::NE | B::E) => TurnRight,
        (Facing::W, B::SE | B::S) => TurnLeft,
    }
}
