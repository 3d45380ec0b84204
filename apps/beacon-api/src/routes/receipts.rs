//! # Receipt Routes
//!
//! Confirming an order creates a receipt. The client sends what it wants,
//! never what it costs: the server looks up the user and the unit price and
//! runs the pricing engine itself.
//!
//! ## Confirmation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POST /api/receipts                                   │
//! │                                                                         │
//! │  { user_id, quantity, variant?, delivery_address? }                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  require_user ──► 404 if missing                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  unit_price_for(user, variant)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewReceipt::for_order ──► 400 quantity <= 0, 422 quantity > 999        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReceiptRepository::create ──► id + YYYYMMDD-CC-NNNN ──► 201            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use beacon_core::validation::{parse_user_id, validate_uuid};
use beacon_core::{CoreError, DeliveryAddress, NewReceipt, Receipt};

use super::quotes::parse_variant;
use super::SuccessResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /api/receipts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceiptRequest {
    pub user_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub variant: Option<String>,
    /// Overrides the user's own address.
    #[serde(default)]
    pub delivery_address: Option<DeliveryAddress>,
}

/// Query string of `GET /api/receipts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptFilter {
    pub user_id: Option<String>,
}

/// `GET /api/receipts`, newest first. `?user_id=` narrows to one user.
pub async fn list_receipts(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ReceiptFilter>,
) -> ApiResult<Json<Vec<Receipt>>> {
    let receipts = match filter.user_id.as_deref() {
        Some(raw) => {
            let user_id = parse_user_id(raw)?;
            state.db.receipts().list_for_user(user_id).await?
        }
        None => state.db.receipts().list().await?,
    };

    info!(count = receipts.len(), "Fetched receipts");
    Ok(Json(receipts))
}

/// `GET /api/receipts/{id}`
pub async fn get_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Receipt>> {
    validate_uuid(&id)?;

    state
        .db
        .receipts()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::ReceiptNotFound(id).into())
}

/// `POST /api/receipts`
pub async fn create_receipt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateReceiptRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let Json(request) = payload?;
    let variant = parse_variant(request.variant.as_deref())?;

    let user = state.require_user(request.user_id).await?;
    let unit_price = state.unit_price_for(&user, variant).await?;

    let draft = NewReceipt::for_order(
        &user,
        request.quantity,
        &unit_price,
        request.delivery_address,
    )?;

    if !draft.delivery_address.is_complete() {
        warn!(user_id = user.id, "Receipt has an incomplete delivery address");
    }

    let receipt = state.db.receipts().create(draft).await?;
    info!(
        receipt_number = %receipt.receipt_number,
        user = %receipt.user_name,
        total_cents = receipt.total_cents,
        "Created receipt"
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `DELETE /api/receipts/{id}`
pub async fn delete_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    validate_uuid(&id)?;
    state.db.receipts().delete(&id).await?;
    info!(id = %id, "Deleted receipt");
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::Utc;
    use serde_json::json;

    use crate::routes::test_support::{seeded_app, send};

    #[tokio::test]
    async fn test_create_receipt_prices_on_server() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 5, "quantity": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        // 3 x 10.00 USD with the customer's 20%
        assert_eq!(body["userName"], "Sherwood Sipes");
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["unitPriceCents"], 1000);
        assert_eq!(body["basePriceCents"], 3000);
        assert_eq!(body["discountCents"], 600);
        assert_eq!(body["totalCents"], 2400);
        assert_eq!(body["discountApplied"], true);
        assert_eq!(body["deliveryAddress"]["city"], "New York");
        assert_eq!(body["deliveryAddress"]["postalCode"], "53073");

        let today = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(body["receiptNumber"], format!("{}-US-0001", today));
    }

    #[tokio::test]
    async fn test_receipt_numbers_increase_within_a_day() {
        let (app, _) = seeded_app().await;

        send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 1, "quantity": 1 })),
        )
        .await;
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 2, "quantity": 1 })),
        )
        .await;

        let number = body["receiptNumber"].as_str().unwrap();
        assert!(number.ends_with("-AU-0002"), "got {}", number);
    }

    #[tokio::test]
    async fn test_create_receipt_with_delivery_override() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({
                "user_id": 3,
                "quantity": 2,
                "variant": "variant2",
                "delivery_address": {
                    "name": "Ada Stiedemann",
                    "address": "Vesterbrogade 12",
                    "postalCode": "1620",
                    "city": "Copenhagen",
                    "country": "Denmark"
                }
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["unitPriceCents"], 7900);
        assert_eq!(body["totalCents"], 15800);
        assert_eq!(body["deliveryAddress"]["address"], "Vesterbrogade 12");
        assert!(body["deliveryAddress"].get("address2").is_none());
    }

    #[tokio::test]
    async fn test_create_receipt_validates_quantity() {
        let (app, state) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 1, "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 1, "quantity": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "BUSINESS_LOGIC");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 42, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(state.db.receipts().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_get_and_delete_receipts() {
        let (app, _) = seeded_app().await;

        let (_, first) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 1, "quantity": 1 })),
        )
        .await;
        let (_, second) = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "user_id": 2, "quantity": 5 })),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/receipts", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], second["id"]);

        let (_, body) = send(&app, Method::GET, "/api/receipts?user_id=1", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let id = first["id"].as_str().unwrap();
        let (status, body) = send(&app, Method::GET, &format!("/api/receipts/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["receiptNumber"], first["receiptNumber"]);

        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/receipts/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/receipts/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/receipts/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
