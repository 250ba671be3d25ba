//! Cafe API handlers
//!
//! Contains HTTP request handlers for browsing, searching, adding and
//! re-pricing cafes.

use crate::cafe::{pick_random, Cafe, CafeId, NewCafe};
use crate::error::{AppError, INVALID_JSON_MESSAGE};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Single cafe response
#[derive(Debug, Serialize)]
pub struct CafeResponse {
    /// The selected cafe
    pub cafe: Cafe,
}

/// Cafe list response
#[derive(Debug, Serialize)]
pub struct CafeListResponse {
    /// Matching cafes in id order
    pub cafe_all: Vec<Cafe>,
}

/// Body returned when a search matches nothing
#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    /// Human-readable explanation
    #[serde(rename = "Not Found")]
    pub not_found: String,
}

/// Search response: either the matches or an error-shaped body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    /// At least one cafe matched
    Found(CafeListResponse),
    /// Nothing matched
    Missing {
        /// Error details
        error: NotFoundBody,
    },
}

/// Success message
#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    /// Human-readable confirmation
    pub success: String,
}

/// Success envelope returned after adding a cafe
#[derive(Debug, Serialize)]
pub struct AddCafeResponse {
    /// Wrapped confirmation
    pub response: SuccessMessage,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Exact location to match
    pub location: Option<String>,
}

/// Price update query parameters
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    /// New price; absent clears the stored price
    pub new_price: Option<String>,
}

/// GET /cafe/random - Get one cafe chosen uniformly at random
pub async fn random_cafe(State(state): State<AppState>) -> Result<Json<CafeResponse>, AppError> {
    let ids = state.cafes.list_all_ids().await?;
    let id = pick_random(&ids).ok_or(AppError::EmptyCatalogue)?;
    let cafe = state.cafes.get_by_id(id).await?;

    debug!(cafe_id = id, candidates = ids.len(), "Picked random cafe");
    Ok(Json(CafeResponse { cafe }))
}

/// GET /cafe/all - List every cafe
pub async fn all_cafes(State(state): State<AppState>) -> Result<Json<CafeListResponse>, AppError> {
    let cafe_all = state.cafes.list_all().await?;
    Ok(Json(CafeListResponse { cafe_all }))
}

/// GET /cafe/search?location= - List cafes at an exact location
///
/// A search with no matches still answers 200, with an error-shaped body.
pub async fn search_cafes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let cafe_all = match query.location.as_deref() {
        Some(location) => state.cafes.get_by_location(location).await?,
        None => Vec::new(),
    };

    debug!(location = ?query.location, matches = cafe_all.len(), "Searched cafes");

    if cafe_all.is_empty() {
        return Ok(Json(SearchResponse::Missing {
            error: NotFoundBody {
                not_found: "Sorry, we don't have a cafe at that location.".to_string(),
            },
        }));
    }

    Ok(Json(SearchResponse::Found(CafeListResponse { cafe_all })))
}

/// POST /cafe/add - Add a new cafe from a JSON body
pub async fn add_cafe(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AddCafeResponse>), AppError> {
    let new_cafe = parse_new_cafe(&body)?;

    let id = state
        .cafes
        .create(&new_cafe)
        .await
        .map_err(AppError::CreateFailed)?;

    info!(cafe_id = id, name = %new_cafe.name, "Added cafe");

    Ok((
        StatusCode::CREATED,
        Json(AddCafeResponse {
            response: SuccessMessage {
                success: "Successfully added the new cafe.".to_string(),
            },
        }),
    ))
}

/// PATCH /cafe/update-coffee-price/:id?new_price= - Update a cafe's coffee price
pub async fn update_coffee_price(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<SuccessMessage>, AppError> {
    let id: CafeId = raw_id
        .parse()
        .map_err(|_| AppError::UnknownCafe(raw_id.clone()))?;

    state
        .cafes
        .update_price(id, query.new_price.as_deref())
        .await?;

    info!(cafe_id = id, new_price = ?query.new_price, "Updated coffee price");

    Ok(Json(SuccessMessage {
        success: "price updated.".to_string(),
    }))
}

/// Parse and validate an add-cafe body
///
/// Anything that is not a non-empty JSON object is a bad request. A client
/// supplied `id` is dropped; ids are always generated. Missing, mistyped,
/// unknown or over-long fields describe a row the table would reject.
fn parse_new_cafe(body: &[u8]) -> Result<NewCafe, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest(INVALID_JSON_MESSAGE.to_string()))?;

    let mut fields = match value {
        serde_json::Value::Object(fields) if !fields.is_empty() => fields,
        _ => return Err(AppError::BadRequest(INVALID_JSON_MESSAGE.to_string())),
    };
    fields.remove("id");

    let new_cafe: NewCafe = serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| AppError::CafeRejected(e.to_string()))?;
    new_cafe.validate().map_err(AppError::CafeRejected)?;

    Ok(new_cafe)
}
