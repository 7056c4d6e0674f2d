//! Core of the Neighborly community task board.
//!
//! The [`board::Board`] controller owns the task, helper, skill and thank-you
//! collections, persists them through a [`storage::KeyValueStore`] and emits
//! [`events::BoardEvent`]s whenever something changes. The CLI and TUI in the
//! binary are thin front ends over it.

pub mod board;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod leaderboard;
pub mod logging;
pub mod models;
pub mod storage;
pub mod timers;
pub mod tui;
pub mod urgency;

pub use board::{Board, BoardState};
pub use error::{BoardError, BoardResult};
pub use models::{Category, NewTask, Skill, Task, ThankYou};
