//! Staff document commands: `docs`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use agency_desk::ApiClient;
use agency_desk::documents::{
    Decision, DocumentBackend, DocumentSigner, SignatureImage, SignerRole,
};
use agency_desk::models::{DocumentStatus, Id, NewStaffDocument, StaffDocument};
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};
use agency_desk::ui::render::{document_icon, render_document};

use super::super::DocsCommands;
use super::{Desk, print_json};

/// Which signing endpoint to call. `--as` wins; otherwise the viewer's role
/// on the document decides.
fn resolve_role(
    explicit: Option<&str>,
    viewer: Option<Id>,
    doc: &StaffDocument,
) -> Result<SignerRole> {
    match explicit.map(|s| s.trim().to_lowercase()) {
        Some(role) if role == "staff" => Ok(SignerRole::Staff),
        Some(role) if role == "manager" => Ok(SignerRole::Manager),
        Some(other) => bail!("Unknown role '{}': expected staff or manager", other),
        None => {
            let role = viewer
                .map(|id| SignerRole::for_viewer(id, doc))
                .unwrap_or(SignerRole::Viewer);
            if role == SignerRole::Viewer {
                bail!("You are neither the staff member nor the line manager; pass --as staff|manager");
            }
            Ok(role)
        }
    }
}

/// Completed and rejected documents accept no further signatures.
fn ensure_open(doc: &StaffDocument) -> Result<()> {
    if doc.status.is_terminal() {
        bail!(
            "Document #{} is already {}; nothing left to sign",
            doc.id,
            doc.status.badge()
        );
    }
    Ok(())
}

async fn decide(
    desk: &mut Desk,
    signer: &DocumentSigner<ApiClient>,
    id: Id,
    role: Option<String>,
    decision: Decision,
) -> Result<StaffDocument> {
    let session = desk.require_login().await?;
    let doc = desk
        .fetch("Loading document...", desk.client.get_document(id))
        .await?;
    ensure_open(&doc)?;
    let role = resolve_role(role.as_deref(), session.user_id(), &doc)?;
    if !role.can_act_on(&doc) {
        // Advisory only: the backend decides.
        desk.notifier.notify(Toast::warning(format!(
            "Document is {}; the server may refuse this action",
            doc.status.badge()
        )));
    }
    let updated = match role {
        SignerRole::Manager => signer.sign_as_manager(id, decision).await?,
        _ => signer.sign_as_staff(id, decision).await?,
    };
    desk.mutated(Mutation::DocumentSigned(id));
    Ok(updated)
}

fn show(desk: &Desk, doc: &StaffDocument) -> Result<()> {
    if desk.is_json() {
        return print_json(doc);
    }
    println!();
    print!("{}", render_document(doc));
    println!();
    Ok(())
}

pub async fn cmd_docs(desk: &mut Desk, command: DocsCommands) -> Result<()> {
    desk.require_login().await?;
    let signer = DocumentSigner::new(desk.client.clone(), desk.notifier.clone());

    match command {
        DocsCommands::List { status } => {
            let status = status
                .map(|s| s.parse::<DocumentStatus>().map_err(|e| anyhow::anyhow!(e)))
                .transpose()?;
            let docs = desk
                .fetch("Loading documents...", desk.client.list_documents())
                .await?;
            let docs: Vec<StaffDocument> = docs
                .into_iter()
                .filter(|d| status.is_none_or(|s| d.status == s))
                .collect();
            desk.store.write(ResourceTag::Documents, docs.clone());
            if desk.is_json() {
                return print_json(&docs);
            }
            println!();
            if docs.is_empty() {
                println!("No documents.");
            }
            for doc in &docs {
                println!(
                    "  {}#{:<5} {:<40} {:<16} {}",
                    document_icon(doc.status),
                    doc.id,
                    doc.title,
                    doc.status.badge(),
                    doc.staff.username
                );
            }
            println!();
        }
        DocsCommands::Show { id } => {
            let doc = desk
                .fetch("Loading document...", desk.client.get_document(id))
                .await?;
            desk.store.write(ResourceTag::Document(id), doc.clone());
            show(desk, &doc)?;
        }
        DocsCommands::Create {
            title,
            staff,
            manager,
            description,
        } => {
            desk.require_admin().await?;
            let new = NewStaffDocument {
                title,
                description: description.unwrap_or_default(),
                staff_id: staff,
                line_manager_id: manager,
            };
            let doc = signer.create(&new).await?;
            desk.mutated(Mutation::DocumentCreated);
            show(desk, &doc)?;
        }
        DocsCommands::Sign {
            id,
            signature,
            comments,
            role,
        } => {
            let bytes = std::fs::read(&signature)
                .with_context(|| format!("Failed to read signature: {}", signature.display()))?;
            let signature = SignatureImage::from_png(&bytes)?;
            let doc = decide(
                desk,
                &signer,
                id,
                role,
                Decision::Approve {
                    signature,
                    comments,
                },
            )
            .await?;
            show(desk, &doc)?;
        }
        DocsCommands::Reject {
            id,
            reason,
            comments,
            role,
        } => {
            let doc = decide(desk, &signer, id, role, Decision::Reject { reason, comments }).await?;
            show(desk, &doc)?;
        }
        DocsCommands::Download { id, out } => {
            let bytes = desk
                .fetch("Downloading PDF...", desk.client.download_pdf(id))
                .await?;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("document-{}.pdf", id)));
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            desk.notifier.notify(Toast::success(format!(
                "Saved {} ({} bytes)",
                path.display(),
                bytes.len()
            )));
        }
    }
    Ok(())
}
