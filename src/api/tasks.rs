use async_trait::async_trait;
use serde_json::json;

use super::ApiClient;
use crate::errors::ApiError;
use crate::kanban::TaskBackend;
use crate::models::{Board, Card, CardPatch, Id, List, NewCard, User};

#[async_trait]
impl TaskBackend for ApiClient {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.get_list("/task/boards/").await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_list("/task/users/").await
    }

    async fn create_board(&self, name: &str) -> Result<Board, ApiError> {
        self.post_json("/task/boards/", &json!({ "name": name })).await
    }

    async fn delete_board(&self, board_id: Id) -> Result<(), ApiError> {
        self.delete(&format!("/task/boards/{}/", board_id)).await
    }

    async fn create_list(&self, board_id: Id, name: &str) -> Result<List, ApiError> {
        self.post_json("/task/lists/", &json!({ "name": name, "board": board_id }))
            .await
    }

    async fn delete_list(&self, list_id: Id) -> Result<(), ApiError> {
        self.delete(&format!("/task/lists/{}/", list_id)).await
    }

    async fn create_card(&self, card: &NewCard) -> Result<Card, ApiError> {
        self.post_json("/task/cards/", card).await
    }

    async fn update_card(&self, card_id: Id, patch: &CardPatch) -> Result<(), ApiError> {
        self.patch_unit(&format!("/task/cards/{}/", card_id), patch)
            .await
    }

    async fn delete_card(&self, card_id: Id) -> Result<(), ApiError> {
        self.delete(&format!("/task/cards/{}/", card_id)).await
    }
}
