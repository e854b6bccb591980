use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Player;

/// Players ordered by score, highest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedLeaderboard {
    entries: Vec<Player>,
}

/// Identities that count as targets for this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    ids: HashSet<String>,
}

impl CandidateSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl RankedLeaderboard {
    /// Sorts by score descending; equal scores fall back to identity ascending.
    pub fn rank<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let mut entries: Vec<Player> = players.into_iter().cloned().collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        Self { entries }
    }

    /// Wraps a sequence that was already ranked elsewhere, keeping its order.
    pub fn from_ranked(entries: Vec<Player>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Player] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top `round(len * percentile)` entries, minus `self_id`.
    pub fn high_scorers(&self, self_id: &str, percentile: f64) -> CandidateSet {
        let cutoff = high_scorer_cutoff(self.entries.len(), percentile);
        self.entries
            .iter()
            .take(cutoff)
            .filter(|entry| entry.id != self_id)
            .map(|entry| entry.id.clone())
            .collect()
    }
}

fn high_scorer_cutoff(len: usize, percentile: f64) -> usize {
    if !percentile.is_finite() || percentile <= 0.0 {
        return 0;
    }
    let cutoff = (len as f64 * percentile.min(1.0)).round();
    (cutoff as usize).min(len)
}
