//! Claims handlers

use std::path::{Path as FsPath, PathBuf};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use core_kernel::ClaimId;
use domain_claims::{ClaimOrchestrator, DocumentStore, ImageReference};

use crate::{AppState, error::ApiError};
use crate::dto::claims::*;

/// Upload received in a claim submission
struct ImageUpload {
    file_name: String,
    data: Bytes,
}

/// Processes a claim submitted as multipart `{policy_id, image, email?}`
pub async fn process_claim(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClaimProcessResponse>, ApiError> {
    let mut policy_id: Option<String> = None;
    let mut email: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("policy_id") => {
                policy_id = Some(field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?);
            }
            Some("email") => {
                email = Some(field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                image = Some(ImageUpload { file_name, data });
            }
            other => debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    let policy_id = policy_id.unwrap_or_default();
    let email = email.filter(|e| !e.trim().is_empty());
    ClaimOrchestrator::validate(&policy_id, email.as_deref())?;

    let image = image.ok_or_else(|| ApiError::Validation("image is required".to_string()))?;
    if image.data.is_empty() {
        return Err(ApiError::Validation("image is empty".to_string()));
    }

    let claim_id = ClaimId::new();
    let path = save_upload(&state.config.upload_dir, &claim_id, &image).await?;
    let reference = ImageReference::stored(image.file_name, path);

    let outcome = state
        .orchestrator
        .process_as(claim_id, &policy_id, &reference, email.as_deref())
        .await?;

    let pdf_url = outcome
        .record
        .document_reference
        .as_ref()
        .map(|_| state.config.document_url(&outcome.record.document_key()));

    Ok(Json(ClaimProcessResponse::new(outcome.record, outcome.notifications, pdf_url)))
}

/// Downloads the newest document rendered for a claim
pub async fn download_document(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.documents.load(&claim_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    ))
}

/// Writes an upload to `<upload_dir>/<claim_id>_<file name>`
async fn save_upload(dir: &FsPath, claim_id: &ClaimId, image: &ImageUpload) -> Result<PathBuf, ApiError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ApiError::Internal(format!("cannot create upload directory: {}", e)))?;

    let path = dir.join(format!("{}_{}", claim_id, sanitize_file_name(&image.file_name)));
    tokio::fs::write(&path, &image.data)
        .await
        .map_err(|e| ApiError::Internal(format!("cannot store upload: {}", e)))?;

    info!(claim_id = %claim_id, path = %path.display(), size = image.data.len(), "Upload stored");
    Ok(path)
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("heavy damage.jpg"), "heavy_damage.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\car.png"), "car.png");
        assert_eq!(sanitize_file_name("..."), "upload");
    }
}
