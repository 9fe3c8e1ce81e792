use std::sync::Arc;

use tracing::{info, warn};

use super::TaskBackend;
use crate::errors::{ApiError, ValidationError};
use crate::models::{Board, Card, CardPatch, CardStatus, Id, List, NewCard};
use crate::notify::{Notifier, Toast};

/// A column as rendered: the list plus its cards in display order.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub list: &'a List,
}

impl<'a> Column<'a> {
    pub fn new(list: &'a List) -> Self {
        Self { list }
    }

    pub fn id(&self) -> Id {
        self.list.id
    }

    pub fn name(&self) -> &'a str {
        &self.list.name
    }

    pub fn cards(&self) -> &'a [Card] {
        &self.list.cards
    }
}

/// Client-side copy of the boards tree.
///
/// The tree is whatever the last successful `refresh` returned, plus any
/// local-only edits (column reorder, the list swap of a card move) made since.
/// Every mutation re-fetches, so local edits never outlive the next response.
pub struct KanbanBoard<B: TaskBackend> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    boards: Vec<Board>,
}

impl<B: TaskBackend> KanbanBoard<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            boards: Vec::new(),
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, board_id: Id) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    /// One column per list of `board_id`, in local order.
    pub fn columns(&self, board_id: Id) -> Vec<Column<'_>> {
        self.board(board_id)
            .map(|b| b.lists.iter().map(Column::new).collect())
            .unwrap_or_default()
    }

    pub fn card_count(&self, board_id: Id) -> usize {
        self.board(board_id).map(Board::card_count).unwrap_or(0)
    }

    pub fn find_card(&self, card_id: Id) -> Option<(&Board, &List, &Card)> {
        self.boards.iter().find_map(|board| {
            board.lists.iter().find_map(|list| {
                list.cards
                    .iter()
                    .find(|c| c.id == card_id)
                    .map(|card| (board, list, card))
            })
        })
    }

    /// Replace the local tree with the backend's.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        match self.backend.list_boards().await {
            Ok(boards) => {
                self.boards = boards;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load boards");
                self.notifier
                    .notify(Toast::error(format!("Failed to load boards: {}", err.toast_message())));
                Err(err)
            }
        }
    }

    /// Reorder columns locally. Column order is not persisted by the backend,
    /// so the next `refresh` restores the server order.
    pub fn reorder_lists(&mut self, board_id: Id, from: usize, to: usize) -> bool {
        let Some(board) = self.boards.iter_mut().find(|b| b.id == board_id) else {
            return false;
        };
        if from >= board.lists.len() || to >= board.lists.len() {
            return false;
        }
        let list = board.lists.remove(from);
        board.lists.insert(to, list);
        true
    }

    /// Put the given lists first, in the given order, leaving the rest after
    /// them. Local only, like `reorder_lists`. Fails with the first id that is
    /// not a list of `board_id`, before anything moves.
    pub fn order_lists(&mut self, board_id: Id, order: &[Id]) -> Result<(), Id> {
        let on_board = |list_id: &Id| {
            self.board(board_id)
                .is_some_and(|b| b.lists.iter().any(|l| l.id == *list_id))
        };
        if let Some(missing) = order.iter().find(|id| !on_board(id)) {
            return Err(*missing);
        }
        for (target, list_id) in order.iter().enumerate() {
            let from = self
                .board(board_id)
                .and_then(|b| b.lists.iter().position(|l| l.id == *list_id));
            if let Some(from) = from {
                self.reorder_lists(board_id, from, target);
            }
        }
        Ok(())
    }

    /// Move a card to another list.
    ///
    /// The card is swapped into the target list locally right away, then the
    /// backend is told and the tree re-fetched. On failure the re-fetch simply
    /// overwrites the local swap.
    pub async fn move_card(&mut self, card_id: Id, to_list: Id) -> Result<(), ApiError> {
        self.swap_locally(card_id, to_list);

        let result = self
            .backend
            .update_card(card_id, &CardPatch::move_to(to_list))
            .await;
        self.finish("Card moved", "Failed to move card", result)
            .await
    }

    pub async fn add_card(&mut self, card: NewCard) -> Result<Card, ApiError> {
        if card.title.trim().is_empty() {
            let err = ApiError::from(ValidationError::new("title", "Card title is required"));
            self.notifier.notify(Toast::error(err.toast_message()));
            return Err(err);
        }

        let result = self.backend.create_card(&card).await;
        self.finish("Card added", "Failed to add card", result).await
    }

    /// Replace the assignees of a card.
    pub async fn assign(&mut self, card_id: Id, user_ids: Vec<Id>) -> Result<(), ApiError> {
        let result = self
            .backend
            .update_card(card_id, &CardPatch::assignees(user_ids))
            .await;
        self.finish("Assignees updated", "Failed to update assignees", result)
            .await
    }

    pub async fn set_status(&mut self, card_id: Id, status: CardStatus) -> Result<(), ApiError> {
        let result = self
            .backend
            .update_card(card_id, &CardPatch::status(status))
            .await;
        let success = format!("Status changed to {}", status);
        self.finish(&success, "Failed to change status", result)
            .await
    }

    pub async fn delete_card(&mut self, card_id: Id) -> Result<(), ApiError> {
        let result = self.backend.delete_card(card_id).await;
        self.finish("Card deleted", "Failed to delete card", result)
            .await
    }

    pub async fn create_board(&mut self, name: &str) -> Result<Board, ApiError> {
        if name.trim().is_empty() {
            let err = ApiError::from(ValidationError::new("name", "Board name is required"));
            self.notifier.notify(Toast::error(err.toast_message()));
            return Err(err);
        }
        let result = self.backend.create_board(name.trim()).await;
        self.finish("Board created", "Failed to create board", result).await
    }

    pub async fn delete_board(&mut self, board_id: Id) -> Result<(), ApiError> {
        let result = self.backend.delete_board(board_id).await;
        self.finish("Board deleted", "Failed to delete board", result)
            .await
    }

    pub async fn create_list(&mut self, board_id: Id, name: &str) -> Result<List, ApiError> {
        if name.trim().is_empty() {
            let err = ApiError::from(ValidationError::new("name", "List name is required"));
            self.notifier.notify(Toast::error(err.toast_message()));
            return Err(err);
        }
        let result = self.backend.create_list(board_id, name.trim()).await;
        self.finish("List created", "Failed to create list", result).await
    }

    pub async fn delete_list(&mut self, list_id: Id) -> Result<(), ApiError> {
        let result = self.backend.delete_list(list_id).await;
        self.finish("List deleted", "Failed to delete list", result)
            .await
    }

    fn swap_locally(&mut self, card_id: Id, to_list: Id) {
        let mut moving = None;
        for board in self.boards.iter_mut() {
            for list in board.lists.iter_mut() {
                if let Some(pos) = list.cards.iter().position(|c| c.id == card_id) {
                    moving = Some(list.cards.remove(pos));
                }
            }
        }
        let Some(mut card) = moving else {
            return;
        };
        card.list = Some(to_list);
        if let Some(list) = self
            .boards
            .iter_mut()
            .flat_map(|b| b.lists.iter_mut())
            .find(|l| l.id == to_list)
        {
            list.cards.push(card);
        }
    }

    /// Common tail of every mutation: toast, then re-fetch.
    async fn finish<T>(
        &mut self,
        success: &str,
        failure: &str,
        result: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                info!("{}", success);
                self.notifier.notify(Toast::success(success));
                // The mutation already landed; a failed re-fetch is reported
                // by `refresh` itself and does not fail the mutation.
                let _ = self.refresh().await;
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "{}", failure);
                self.notifier
                    .notify(Toast::error(format!("{}: {}", failure, err.toast_message())));
                let _ = self.refresh().await;
                Err(err)
            }
        }
    }
}
