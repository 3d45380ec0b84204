//! # User Directory Routes
//!
//! ```text
//! GET    /api/users             ──► every user, by id
//! GET    /api/users/{id}        ──► 400 non-numeric id, 404 missing
//! POST   /api/users             ──► id = max + 1, 201
//! PUT    /api/users/{id}        ──► partial update, 404 missing
//! DELETE /api/users/{id}        ──► { success: true }, 404 missing
//! POST   /api/users/initialize  ──► bulk load, only into an empty directory
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use beacon_core::validation::{
    normalize_country_id, parse_user_id, validate_new_user, validate_user, validate_user_update,
};
use beacon_core::{NewUser, User, UserUpdate};
use beacon_db::InitializeOutcome;

use super::SuccessResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /api/users/initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeUsersRequest {
    pub users: Vec<User>,
}

/// Result of `POST /api/users/initialize`.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeUsersResponse {
    pub success: bool,
    pub message: String,
}

impl From<InitializeOutcome> for InitializeUsersResponse {
    fn from(outcome: InitializeOutcome) -> Self {
        let message = match outcome {
            InitializeOutcome::Seeded { inserted } => format!("Initialized {} users", inserted),
            InitializeOutcome::AlreadyPopulated { existing } => {
                format!("Collection already has {} users", existing)
            }
        };
        InitializeUsersResponse {
            success: true,
            message,
        }
    }
}

/// `GET /api/users`
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    let users = state.db.users().list().await?;
    info!(count = users.len(), "Fetched users");
    Ok(Json(users))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    Ok(Json(state.require_user(id).await?))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(mut new_user) = payload?;
    validate_new_user(&new_user)?;
    new_user.country_id = normalize_country_id(&new_user.country_id);

    let user = state.db.users().create(new_user).await?;
    info!(id = user.id, name = %user.full_name, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users/{id}`
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    let Json(mut update) = payload?;
    validate_user_update(&update)?;
    update.country_id = update.country_id.as_deref().map(normalize_country_id);

    let user = state.db.users().update(id, update).await?;
    info!(id = user.id, name = %user.full_name, "Updated user");

    Ok(Json(user))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = parse_user_id(&id)?;
    state.db.users().delete(id).await?;
    info!(id = id, "Deleted user");
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /api/users/initialize`
///
/// Every user is validated before anything is written. Answers 200 whether
/// the directory was seeded or already populated; the message says which.
pub async fn initialize_users(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InitializeUsersRequest>, JsonRejection>,
) -> ApiResult<Json<InitializeUsersResponse>> {
    let Json(mut request) = payload?;
    for user in &mut request.users {
        validate_user(user)?;
        user.country_id = normalize_country_id(&user.country_id);
    }

    let outcome = state.db.users().initialize(&request.users).await?;
    info!(?outcome, "Initialize users");
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use beacon_core::fixtures::sample_users;
    use serde_json::json;

    use crate::routes::test_support::{empty_app, seeded_app, send, send_raw};

    #[tokio::test]
    async fn test_list_users() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/users", None).await;

        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(users[0]["full_name"], "Karmen Fadel");
    }

    #[tokio::test]
    async fn test_get_user() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/users/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "Lasonya Dietrich Sr.");
        assert_eq!(body["discount_percent"], 10.0);

        let (status, body) = send(&app, Method::GET, "/api/users/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = send(&app, Method::GET, "/api/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_user_assigns_next_id() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({
                "full_name": "Noor Hansen",
                "address1": "Nørregade 1",
                "postal_code": 1165,
                "city": "Copenhagen",
                "country_name": "Denmark",
                "country_id": "DK"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 6);
        assert_eq!(body["country_id"], "dk");
        assert_eq!(body["postal_code"], "1165");
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_payloads() {
        let (app, _) = seeded_app().await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({
                "full_name": "  ",
                "country_name": "Denmark",
                "country_id": "dk"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send_raw(&app, Method::POST, "/api/users", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_user() {
        let (app, _) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/users/3",
            Some(json!({ "city": "Aarhus", "discount_percent": 5.0 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Aarhus");
        assert_eq!(body["discount_percent"], 5.0);
        assert_eq!(body["full_name"], "Ada Stiedemann");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/users/99",
            Some(json!({ "city": "Aarhus" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/users/3",
            Some(json!({ "discount_percent": 150.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (app, state) = seeded_app().await;

        let (status, body) = send(&app, Method::DELETE, "/api/users/4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(state.db.users().count().await.unwrap(), 4);

        let (status, _) = send(&app, Method::DELETE, "/api/users/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_only_fills_empty_directory() {
        let app = empty_app().await;
        let body = json!({ "users": sample_users() });

        let (status, response) =
            send(&app, Method::POST, "/api/users/initialize", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
        assert_eq!(response["message"], "Initialized 5 users");

        let (status, response) =
            send(&app, Method::POST, "/api/users/initialize", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Collection already has 5 users");
    }

    #[tokio::test]
    async fn test_initialize_normalizes_country_ids() {
        let app = empty_app().await;
        let mut users = sample_users();
        users[2].country_id = "DK".to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/users/initialize",
            Some(json!({ "users": users })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/users/3", None).await;
        assert_eq!(body["country_id"], "dk");
    }

    #[tokio::test]
    async fn test_initialize_rejects_invalid_users() {
        let app = empty_app().await;

        let mut users = sample_users();
        users[4].country_id = "DNK".to_string();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users/initialize",
            Some(json!({ "users": users })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let mut users = sample_users();
        users[0].full_name = "  ".to_string();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/users/initialize",
            Some(json!({ "users": users })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/api/users", None).await;
        assert_eq!(body.as_array().unwrap().len(), 0);
    }
}
