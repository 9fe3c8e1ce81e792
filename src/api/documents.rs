use async_trait::async_trait;

use super::ApiClient;
use crate::documents::{DocumentBackend, SignPayload, SignStage};
use crate::errors::ApiError;
use crate::models::{Id, NewStaffDocument, StaffDocument};

const DOCUMENTS: &str = "/task/staff-documents/";

#[async_trait]
impl DocumentBackend for ApiClient {
    async fn list_documents(&self) -> Result<Vec<StaffDocument>, ApiError> {
        self.get_list(DOCUMENTS).await
    }

    async fn get_document(&self, id: Id) -> Result<StaffDocument, ApiError> {
        self.get_json(&format!("{}{}/", DOCUMENTS, id)).await
    }

    async fn create_document(&self, doc: &NewStaffDocument) -> Result<StaffDocument, ApiError> {
        self.post_json(DOCUMENTS, doc).await
    }

    async fn sign(&self, id: Id, stage: SignStage, payload: &SignPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}{}/{}/", DOCUMENTS, id, stage.action()), payload)
            .await
    }

    async fn download_pdf(&self, id: Id) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!("{}{}/download_pdf/", DOCUMENTS, id))
            .await
    }
}
