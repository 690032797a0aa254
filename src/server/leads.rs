use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::error::Error;
use crate::query::{LeadQuery, ListLeadsParams};
use crate::server::AppState;
use crate::server::dto::{LeadListResponse, LeadResponse};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt, store_error};
use crate::server::validation::{LEAD_NOT_FOUND, validate_lead_id};
use crate::types::{LeadDraft, timestamp_now, validate_lead_changes, validate_new_lead};

pub fn lead_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        // Static segments win over `{id}`, so these never reach get_lead.
        .route("/stats", get(lead_stats))
        .route("/analytics", get(lead_stats))
        .route("/{id}", get(get_lead).patch(update_lead))
}

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListLeadsParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = LeadQuery::from_params(&params).map_err(ApiError::from)?;

    let page = state
        .store
        .list_leads(&query)
        .api_err("Failed to list leads")?;

    Ok::<_, ApiError>(Json(LeadListResponse {
        total: page.total,
        page: query.page.number,
        limit: query.page.limit,
        pages: query.page.page_count(page.total),
        leads: page.leads,
    }))
}

pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    validate_lead_id(&id)?;

    let lead = state
        .store
        .get_lead(&id)
        .api_err("Failed to get lead")?
        .or_not_found(LEAD_NOT_FOUND)?;

    Ok::<_, ApiError>(Json(LeadResponse { lead }))
}

pub async fn lead_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state
        .store
        .lead_stats()
        .api_err("Failed to compute lead statistics")?;

    Ok::<_, ApiError>(Json(stats))
}

pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LeadDraft>, JsonRejection>,
) -> impl IntoResponse {
    let Json(draft) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let fields = validate_new_lead(&draft).map_err(ApiError::from)?;

    let lead = fields.into_lead(Uuid::new_v4().to_string(), timestamp_now());
    state
        .store
        .create_lead(&lead)
        .api_err("Failed to create lead")?;

    tracing::info!(lead_id = %lead.id, "Created lead");

    Ok::<_, ApiError>((StatusCode::CREATED, Json(LeadResponse { lead })))
}

pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<LeadDraft>, JsonRejection>,
) -> impl IntoResponse {
    validate_lead_id(&id)?;
    let Json(draft) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let changes = validate_lead_changes(&draft).map_err(ApiError::from)?;

    let mut lead = state
        .store
        .get_lead(&id)
        .api_err("Failed to get lead")?
        .or_not_found(LEAD_NOT_FOUND)?;

    if changes.is_empty() {
        return Ok(Json(LeadResponse { lead }));
    }

    changes.apply(&mut lead, timestamp_now());
    match state.store.update_lead(&lead) {
        Ok(()) => {}
        Err(Error::NotFound) => return Err(ApiError::not_found(LEAD_NOT_FOUND)),
        Err(e) => return Err(store_error(e, "Failed to update lead")),
    }

    Ok::<_, ApiError>(Json(LeadResponse { lead }))
}
