//! Skill handlers
//!
//! Each skill runs one pipeline step on its own so an external agent can
//! orchestrate the steps itself.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::{ClaimId, Money, OfferId};
use domain_claims::payout::calculate_with_terms;
use domain_claims::{ClaimDocument, DocumentStore, ImageReference};

use crate::{AppState, error::ApiError};
use crate::dto::tools::*;

/// Classification only
pub async fn analyze_image(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeImageQuery>,
) -> Result<Json<AnalyzeImageResponse>, ApiError> {
    query.validate()?;

    let damage = state
        .orchestrator
        .classifier()
        .classify(&ImageReference::named(query.image_name))
        .await
        .map_err(|e| ApiError::Upstream(format!("Classification failed: {}", e)))?;

    Ok(Json(damage.into()))
}

/// Payout only, with an optional deductible override
pub async fn calculate_payout(
    State(state): State<AppState>,
    Json(request): Json<CalculatePayoutRequest>,
) -> Result<Json<CalculatePayoutResponse>, ApiError> {
    request.validate()?;

    let damage_type = request.damage_type.as_deref().unwrap_or_default();
    let policy = state.orchestrator.policies().lookup(&request.policy_id, damage_type);
    let currency = policy.deductible.currency();

    let is_covered = request.damage_type.is_none() || policy.is_covered;
    let deductible = request
        .deductible
        .map(|amount| Money::new(amount, currency))
        .unwrap_or(policy.deductible);

    let decision = calculate_with_terms(
        Money::new(request.repair_cost, currency),
        deductible,
        policy.coverage_limit,
        is_covered,
    )?;

    let offer_id = format!("{}-{}", OfferId::prefix(), OfferId::new().short_code());
    info!(
        policy_id = %request.policy_id,
        offer_id = %offer_id,
        payout = %decision.payout_amount.amount(),
        status = %decision.status,
        "Payout skill"
    );

    Ok(Json(CalculatePayoutResponse {
        policy_id: request.policy_id,
        payout: decision.payout_amount.amount(),
        status: decision.status,
        offer_letter_url: state.config.document_url(&offer_id),
        offer_id,
    }))
}

/// Document only: renders an offer summary
pub async fn generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<GeneratePdfRequest>,
) -> Result<Json<GeneratePdfResponse>, ApiError> {
    request.validate()?;

    let key = request
        .claim_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| ClaimId::new().to_string());

    let document = ClaimDocument::offer_summary(
        key,
        &request.policy_id,
        &request.damage_type,
        Money::usd(request.final_amount),
    );
    let reference = state.documents.render(&document).await?;

    Ok(Json(GeneratePdfResponse {
        message: "PDF generated successfully".to_string(),
        download_url: state.config.document_url(&reference.key),
        filename: reference.filename,
    }))
}
