use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::LeaderboardCache;
use crate::constants::{LEADERBOARD_KEY, LEADERBOARD_VERSION};
use crate::error::LeaderboardError;
use crate::leaderboard::RankedLeaderboard;
use crate::types::ArenaSnapshot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardDocument {
    pub version: u8,
    #[serde(rename = "updatedAtMs", alias = "updated_at_ms")]
    pub updated_at_ms: u64,
    #[serde(rename = "generatedAtIso", default)]
    pub generated_at_iso: String,
    pub entries: RankedLeaderboard,
}

impl LeaderboardDocument {
    pub fn new(entries: RankedLeaderboard, now_ms: u64) -> Self {
        Self {
            version: LEADERBOARD_VERSION,
            updated_at_ms: now_ms,
            generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            entries,
        }
    }
}

/// Reads the cached leaderboard and checks it is usable.
///
/// `max_age_ms == 0` disables the freshness check.
pub fn fetch_leaderboard(
    cache: &dyn LeaderboardCache,
    now_ms: u64,
    max_age_ms: u64,
) -> Result<RankedLeaderboard, LeaderboardError> {
    let document = fetch_document(cache)?;
    let age_ms = now_ms.saturating_sub(document.updated_at_ms);
    if max_age_ms > 0 && age_ms > max_age_ms {
        return Err(LeaderboardError::Stale { age_ms, max_age_ms });
    }
    Ok(document.entries)
}

/// Same as [`fetch_leaderboard`], but a degraded cache only costs a warning.
pub fn fetch_leaderboard_or_warn(
    cache: &dyn LeaderboardCache,
    now_ms: u64,
    max_age_ms: u64,
) -> Option<RankedLeaderboard> {
    match fetch_leaderboard(cache, now_ms, max_age_ms) {
        Ok(board) => {
            debug!(entries = board.len(), "using cached leaderboard");
            Some(board)
        }
        Err(LeaderboardError::Missing(key)) => {
            debug!(%key, "no leaderboard published yet");
            None
        }
        Err(error) => {
            warn!(%error, "ignoring cached leaderboard");
            None
        }
    }
}

/// Reads and parses the cached document without any freshness check.
pub fn fetch_document(
    cache: &dyn LeaderboardCache,
) -> Result<LeaderboardDocument, LeaderboardError> {
    let text = cache
        .get(LEADERBOARD_KEY)?
        .ok_or_else(|| LeaderboardError::Missing(LEADERBOARD_KEY.to_string()))?;
    parse_document(&text)
}

pub fn parse_document(text: &str) -> Result<LeaderboardDocument, LeaderboardError> {
    let document: LeaderboardDocument = serde_json::from_str(text)?;
    if document.version != LEADERBOARD_VERSION {
        return Err(LeaderboardError::UnsupportedVersion(document.version));
    }
    Ok(document)
}

/// Ranks the players of `snapshot` and stores the result under the leaderboard key.
pub fn publish_leaderboard(
    cache: &dyn LeaderboardCache,
    snapshot: &ArenaSnapshot,
    now_ms: u64,
) -> Result<LeaderboardDocument, LeaderboardError> {
    let ranked = RankedLeaderboard::rank(snapshot.players.values());
    let document = LeaderboardDocument::new(ranked, now_ms);
    let text = serde_json::to_string(&document)?;
    cache.set(LEADERBOARD_KEY, text)?;
    debug!(entries = document.entries.len(), "published leaderboard");
    Ok(document)
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
