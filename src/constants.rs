pub const DEFAULT_MAX_THROW_DISTANCE: usize = 3;
pub const DEFAULT_HIGH_SCORING_PERCENTILE: f64 = 0.5;
/// Upper bound on `width * height` accepted from a turn request.
pub const MAX_ARENA_CELLS: usize = 1 << 20;

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const LEADERBOARD_VERSION: u8 = 1;
pub const DEFAULT_LEADERBOARD_MAX_AGE_MS: u64 = 60_000;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_TRACKED_PLAYERS: usize = 1024;

pub const BANNER: &str = "Let the battle begin!";
