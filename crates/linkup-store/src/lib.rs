//! # linkup-store
//!
//! Local SQLite storage standing in for the hosted backend: the `locations`,
//! `users`, `groups`, `group_members` and `messages` tables, plus a realtime
//! hub that publishes a [`ChangeEvent`] for every row written.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model in `linkup-shared`.

pub mod database;
pub mod groups;
pub mod locations;
pub mod messages;
pub mod migrations;
pub mod realtime;
pub mod seed;
pub mod users;

mod error;
mod rows;

pub use database::Database;
pub use error::{Result, StoreError};
pub use groups::GroupQuery;
pub use realtime::{ChangeEvent, ChangeFilter, ChangeKind, RealtimeHub, Subscription};
