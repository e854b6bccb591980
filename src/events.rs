use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::LeaderboardCache;
use crate::error::{ArenaError, PublishError};
use crate::leaderboard_store::{now_ms, publish_leaderboard};
use crate::metrics::ScoreSink;
use crate::protocol::parse_snapshot;
use crate::types::ArenaUpdate;

/// A broadcast turn: the raw request re-encoded as JSON, plus a message id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnEvent {
    pub id: String,
    pub data: String,
}

/// Fire-and-forget publisher onto the bounded turn queue.
#[derive(Clone, Debug)]
pub struct TurnPublisher {
    tx: mpsc::Sender<TurnEvent>,
}

impl TurnPublisher {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TurnEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Never waits: a full queue drops the event.
    pub fn publish(&self, update: &ArenaUpdate) -> Result<String, PublishError> {
        let event = TurnEvent {
            id: make_message_id(),
            data: serde_json::to_string(update)?,
        };
        let id = event.id.clone();
        match self.tx.try_send(event) {
            Ok(()) => Ok(id),
            Err(TrySendError::Full(_)) => Err(PublishError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(PublishError::Closed),
        }
    }

    /// Publishes and logs the outcome; failures never reach the caller.
    pub fn publish_or_warn(&self, update: &ArenaUpdate) {
        match self.publish(update) {
            Ok(id) => debug!(message_id = %id, "published turn event"),
            Err(error) => warn!(%error, "dropping turn event"),
        }
    }
}

fn make_message_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Consumer side of the turn queue: refreshes the cached leaderboard and
/// records every player's score.
pub struct TurnEventProcessor {
    cache: Arc<dyn LeaderboardCache>,
    scores: Arc<dyn ScoreSink>,
}

impl TurnEventProcessor {
    pub fn new(cache: Arc<dyn LeaderboardCache>, scores: Arc<dyn ScoreSink>) -> Self {
        Self { cache, scores }
    }

    pub fn process(&self, event: &TurnEvent) -> Result<(), ArenaError> {
        let snapshot = parse_snapshot(&event.data)?;
        for player in snapshot.players.values() {
            self.scores.record(&player.id, player.score);
        }
        if let Err(error) = publish_leaderboard(&*self.cache, &snapshot, now_ms()) {
            warn!(message_id = %event.id, %error, "failed to update leaderboard");
        }
        Ok(())
    }

    pub fn spawn(self, mut rx: mpsc::Receiver<TurnEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(error) = self.process(&event) {
                    warn!(message_id = %event.id, %error, "discarding turn event");
                }
            }
            info!("turn event queue closed");
        })
    }
}
