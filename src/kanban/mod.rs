//! Boards, lists and cards, and the data flow between them.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────────┐  refresh / mutate  ┌─────────────────────────┐
//! │ cmd::board   │ ─────────────────> │ board.rs  KanbanBoard   │
//! │ cmd::card    │                    │   (fetched Board tree)  │
//! └──────────────┘                    └───────────┬─────────────┘
//!                                                 │ TaskBackend
//! ┌──────────────┐  filter / assign   ┌───────────v─────────────┐
//! │ cmd::tasks   │ ─────────────────> │ table.rs  TaskTable     │
//! └──────────────┘                    │           TaskAssigner  │
//!                                     └─────────────────────────┘
//! ```
//!
//! Every write goes to the backend and is followed by a full re-fetch of the
//! boards; the local tree is never reconciled by hand beyond the ephemeral
//! list swap of a card move.

pub mod board;
pub mod table;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{Board, Card, CardPatch, Id, List, NewCard, User};

/// The task endpoints the board and table need.
/// Real implementation: `ApiClient`. Test double: `FakeTaskBackend`.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// All boards with their lists and cards embedded.
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn create_board(&self, name: &str) -> Result<Board, ApiError>;

    async fn delete_board(&self, board_id: Id) -> Result<(), ApiError>;

    async fn create_list(&self, board_id: Id, name: &str) -> Result<List, ApiError>;

    async fn delete_list(&self, list_id: Id) -> Result<(), ApiError>;

    async fn create_card(&self, card: &NewCard) -> Result<Card, ApiError>;

    async fn update_card(&self, card_id: Id, patch: &CardPatch) -> Result<(), ApiError>;

    async fn delete_card(&self, card_id: Id) -> Result<(), ApiError>;
}
