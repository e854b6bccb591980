pub mod arena;
pub mod cache;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod leaderboard_store;
pub mod metrics;
pub mod protocol;
pub mod service;
pub mod types;
