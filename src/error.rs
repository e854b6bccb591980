use thiserror::Error;

/// Malformed turn input. The engine refuses to pick an action for these.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("failed to decode turn request: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("arena dims must have exactly 2 entries, got {0}")]
    DimsLength(usize),
    #[error("arena must be at least 1x1, got {width}x{height}")]
    EmptyArena { width: i64, height: i64 },
    #[error("arena {width}x{height} exceeds the {max_cells} cell limit")]
    ArenaTooLarge {
        width: i64,
        height: i64,
        max_cells: usize,
    },
    #[error("self player '{0}' is not present in arena state")]
    MissingSelf(String),
    #[error("player '{id}' at ({x}, {y}) is outside the {width}x{height} arena")]
    OutOfBounds {
        id: String,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache is busy")]
    Busy,
    #[error("cache lock poisoned")]
    Poisoned,
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a cached leaderboard cannot be used. None of these are fatal to a turn.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard cache unavailable: {0}")]
    Unavailable(#[from] CacheError),
    #[error("leaderboard key '{0}' is not set")]
    Missing(String),
    #[error("leaderboard document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported leaderboard version {0}")]
    UnsupportedVersion(u8),
    #[error("leaderboard is stale: age {age_ms}ms exceeds {max_age_ms}ms")]
    Stale { age_ms: u64, max_age_ms: u64 },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("turn event queue is full")]
    QueueFull,
    #[error("turn event queue is closed")]
    Closed,
    #[error("failed to encode turn event: {0}")]
    Encode(#[from] serde_json::Error),
}
