//! Staff document sign-off workflow.
//!
//! A document moves `pending_staff → pending_manager → completed`, or to
//! `rejected` from either pending state. The backend enforces this; the
//! client only uses it to decide which actions to offer and re-fetches the
//! document after every action.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{ApiError, ValidationError};
use crate::models::{DocumentStatus, Id, NewStaffDocument, StaffDocument};
use crate::notify::{Notifier, Toast};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

impl DocumentStatus {
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, next),
            (PendingStaff, PendingManager)
                | (PendingManager, Completed)
                | (PendingStaff, Rejected)
                | (PendingManager, Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Human label shown on the status badge.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::PendingStaff => "Pending Staff",
            Self::PendingManager => "Pending Manager",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }
}

/// Which signing actions to offer the viewer. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRole {
    Staff,
    Manager,
    Viewer,
}

impl SignerRole {
    pub fn for_viewer(viewer_id: Id, doc: &StaffDocument) -> Self {
        if doc.line_manager.as_ref().is_some_and(|m| m.id == viewer_id) {
            Self::Manager
        } else if doc.staff.id == viewer_id {
            Self::Staff
        } else {
            Self::Viewer
        }
    }

    /// Whether this role has an action available at the document's status.
    pub fn can_act_on(&self, doc: &StaffDocument) -> bool {
        matches!(
            (self, doc.status),
            (Self::Staff, DocumentStatus::PendingStaff)
                | (Self::Manager, DocumentStatus::PendingManager)
        )
    }
}

/// A signature as the backend expects it: a PNG data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage(String);

impl SignatureImage {
    pub fn from_png(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::new("signature", "Please provide a signature"));
        }
        if !bytes.starts_with(PNG_MAGIC) {
            return Err(ValidationError::new("signature", "Signature must be a PNG image"));
        }
        Ok(Self(format!("data:image/png;base64,{}", STANDARD.encode(bytes))))
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve {
        signature: SignatureImage,
        comments: String,
    },
    Reject {
        reason: String,
        comments: String,
    },
}

/// Request body of `sign_by_staff` / `sign_by_manager`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignPayload {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Decision {
    fn into_payload(self) -> Result<SignPayload, ValidationError> {
        match self {
            Decision::Approve {
                signature,
                comments,
            } => Ok(SignPayload {
                approved: true,
                signature: Some(signature.0),
                comments,
                rejection_reason: None,
            }),
            Decision::Reject { reason, comments } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(ValidationError::new(
                        "rejection_reason",
                        "Please provide a reason for rejection",
                    ));
                }
                Ok(SignPayload {
                    approved: false,
                    signature: None,
                    comments,
                    rejection_reason: Some(reason.to_string()),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignStage {
    Staff,
    Manager,
}

impl SignStage {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Staff => "sign_by_staff",
            Self::Manager => "sign_by_manager",
        }
    }
}

/// The staff-document endpoints.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<StaffDocument>, ApiError>;

    async fn get_document(&self, id: Id) -> Result<StaffDocument, ApiError>;

    async fn create_document(&self, doc: &NewStaffDocument) -> Result<StaffDocument, ApiError>;

    async fn sign(&self, id: Id, stage: SignStage, payload: &SignPayload) -> Result<(), ApiError>;

    async fn download_pdf(&self, id: Id) -> Result<Vec<u8>, ApiError>;
}

pub struct DocumentSigner<B: DocumentBackend> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
}

impl<B: DocumentBackend> DocumentSigner<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    pub async fn sign_as_staff(&self, id: Id, decision: Decision) -> Result<StaffDocument, ApiError> {
        self.submit(id, SignStage::Staff, decision).await
    }

    pub async fn sign_as_manager(
        &self,
        id: Id,
        decision: Decision,
    ) -> Result<StaffDocument, ApiError> {
        self.submit(id, SignStage::Manager, decision).await
    }

    /// Validates locally, posts the action, then re-fetches the document.
    async fn submit(
        &self,
        id: Id,
        stage: SignStage,
        decision: Decision,
    ) -> Result<StaffDocument, ApiError> {
        let payload = match decision.into_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier.notify(Toast::error(err.message.clone()));
                return Err(err.into());
            }
        };

        if let Err(err) = self.backend.sign(id, stage, &payload).await {
            warn!(document = id, action = stage.action(), error = %err, "signing failed");
            self.notifier.notify(Toast::error(err.toast_message()));
            return Err(err);
        }

        let message = if payload.approved {
            "Document signed successfully"
        } else {
            "Document rejected"
        };
        info!(document = id, action = stage.action(), approved = payload.approved, "document signed");
        self.notifier.notify(Toast::success(message));

        self.backend.get_document(id).await
    }

    pub async fn create(&self, doc: &NewStaffDocument) -> Result<StaffDocument, ApiError> {
        if doc.title.trim().is_empty() {
            let err = ValidationError::new("title", "Title is required");
            self.notifier.notify(Toast::error(err.message.clone()));
            return Err(err.into());
        }
        match self.backend.create_document(doc).await {
            Ok(created) => {
                self.notifier.notify(Toast::success("Document created"));
                Ok(created)
            }
            Err(err) => {
                self.notifier.notify(Toast::error(err.toast_message()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::UserRef;
    use crate::notify::{RecordingNotifier, ToastLevel};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 13];

    struct FakeDocs {
        doc: Mutex<StaffDocument>,
        signed: Mutex<Vec<(Id, SignStage, SignPayload)>>,
    }

    impl FakeDocs {
        fn new(status: DocumentStatus) -> Self {
            Self {
                doc: Mutex::new(document(status)),
                signed: Mutex::new(Vec::new()),
            }
        }

        fn sign_calls(&self) -> usize {
            self.signed.lock().unwrap().len()
        }
    }

    fn document(status: DocumentStatus) -> StaffDocument {
        StaffDocument {
            id: 5,
            title: "Leave request".into(),
            description: String::new(),
            status,
            staff: UserRef {
                id: 1,
                username: "amy".into(),
            },
            line_manager: Some(UserRef {
                id: 9,
                username: "mgr".into(),
            }),
            staff_signature: None,
            manager_signature: None,
            staff_comments: None,
            manager_comments: None,
            rejection_reason: None,
            created_at: None,
            staff_signed_at: None,
            manager_signed_at: None,
        }
    }

    #[async_trait]
    impl DocumentBackend for FakeDocs {
        async fn list_documents(&self) -> Result<Vec<StaffDocument>, ApiError> {
            Ok(vec![self.doc.lock().unwrap().clone()])
        }

        async fn get_document(&self, _id: Id) -> Result<StaffDocument, ApiError> {
            Ok(self.doc.lock().unwrap().clone())
        }

        async fn create_document(&self, doc: &NewStaffDocument) -> Result<StaffDocument, ApiError> {
            let mut created = document(DocumentStatus::PendingStaff);
            created.title = doc.title.clone();
            Ok(created)
        }

        async fn sign(
            &self,
            id: Id,
            stage: SignStage,
            payload: &SignPayload,
        ) -> Result<(), ApiError> {
            self.signed
                .lock()
                .unwrap()
                .push((id, stage, payload.clone()));
            let mut doc = self.doc.lock().unwrap();
            doc.status = match (stage, payload.approved) {
                (_, false) => DocumentStatus::Rejected,
                (SignStage::Staff, true) => DocumentStatus::PendingManager,
                (SignStage::Manager, true) => DocumentStatus::Completed,
            };
            doc.rejection_reason = payload.rejection_reason.clone();
            Ok(())
        }

        async fn download_pdf(&self, _id: Id) -> Result<Vec<u8>, ApiError> {
            Ok(b"%PDF-1.4".to_vec())
        }
    }

    fn signer(backend: Arc<FakeDocs>) -> (DocumentSigner<FakeDocs>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (DocumentSigner::new(backend, notifier.clone()), notifier)
    }

    #[test]
    fn test_transitions() {
        use DocumentStatus::*;
        assert!(PendingStaff.can_transition_to(PendingManager));
        assert!(PendingManager.can_transition_to(Completed));
        assert!(PendingStaff.can_transition_to(Rejected));
        assert!(PendingManager.can_transition_to(Rejected));
        assert!(!PendingStaff.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(PendingStaff));
        assert!(Completed.is_terminal());
    }

    #[test]
    fn test_signer_role_for_viewer() {
        let doc = document(DocumentStatus::PendingManager);
        assert_eq!(SignerRole::for_viewer(9, &doc), SignerRole::Manager);
        assert_eq!(SignerRole::for_viewer(1, &doc), SignerRole::Staff);
        assert_eq!(SignerRole::for_viewer(3, &doc), SignerRole::Viewer);
        assert!(SignerRole::Manager.can_act_on(&doc));
        assert!(!SignerRole::Staff.can_act_on(&doc));
    }

    #[test]
    fn test_signature_image_requires_png() {
        let sig = SignatureImage::from_png(PNG).unwrap();
        assert!(sig.as_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert!(SignatureImage::from_png(&[]).is_err());
        assert!(SignatureImage::from_png(b"GIF89a").is_err());
    }

    #[tokio::test]
    async fn test_manager_reject_with_reason_shows_rejected_badge() {
        let backend = Arc::new(FakeDocs::new(DocumentStatus::PendingManager));
        let (signer, notifier) = signer(backend.clone());

        let doc = signer
            .sign_as_manager(
                5,
                Decision::Reject {
                    reason: "Dates overlap with release".into(),
                    comments: String::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(doc.status.badge(), "Rejected");
        let signed = backend.signed.lock().unwrap().clone();
        assert_eq!(signed.len(), 1);
        let (_, stage, payload) = &signed[0];
        assert_eq!(*stage, SignStage::Manager);
        assert!(!payload.approved);
        assert_eq!(
            payload.rejection_reason.as_deref(),
            Some("Dates overlap with release")
        );
        assert_eq!(notifier.last().unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_empty_reason_is_blocked_without_a_call() {
        let backend = Arc::new(FakeDocs::new(DocumentStatus::PendingManager));
        let (signer, notifier) = signer(backend.clone());

        let err = signer
            .sign_as_manager(
                5,
                Decision::Reject {
                    reason: "   ".into(),
                    comments: "n/a".into(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(backend.sign_calls(), 0);
        assert_eq!(notifier.count(ToastLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_staff_approve_moves_to_pending_manager() {
        let backend = Arc::new(FakeDocs::new(DocumentStatus::PendingStaff));
        let (signer, _) = signer(backend.clone());

        let doc = signer
            .sign_as_staff(
                5,
                Decision::Approve {
                    signature: SignatureImage::from_png(PNG).unwrap(),
                    comments: "Signed".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(doc.status, DocumentStatus::PendingManager);
        let payload = serde_json::to_value(&backend.signed.lock().unwrap()[0].2).unwrap();
        assert_eq!(payload["approved"], true);
        assert!(payload.get("rejection_reason").is_none());
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let backend = Arc::new(FakeDocs::new(DocumentStatus::PendingStaff));
        let (signer, _) = signer(backend);
        let doc = NewStaffDocument {
            title: " ".into(),
            description: String::new(),
            staff_id: 1,
            line_manager_id: None,
        };
        assert!(signer.create(&doc).await.unwrap_err().is_validation());
    }
}
