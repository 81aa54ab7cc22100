use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Client, ClientId, OwnerId, Questionnaire};
use super::engine::{recompute, DerivedFields};
use super::reconcile::DerivedPatch;
use super::repository::{ClientRepository, RepositoryError};
use super::service::{ClientService, ClientServiceError};
use super::update::ClientUpdate;

/// Body of create and patch requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub updates: Vec<ClientUpdate>,
}

/// Stateless recompute result for a posted client document.
#[derive(Debug, Clone, Serialize)]
pub struct DeriveResponse {
    pub derived: DerivedFields,
    pub patch: DerivedPatch,
}

/// Router builder exposing the per-user client endpoints.
pub fn client_router<R>(service: Arc<ClientService<R>>) -> Router
where
    R: ClientRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:owner_id/clients",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/users/:owner_id/clients/:client_id",
            get(fetch_handler::<R>).patch(update_handler::<R>),
        )
        .route(
            "/api/v1/users/:owner_id/clients/:client_id/questionnaire",
            put(questionnaire_handler::<R>),
        )
        .route(
            "/api/v1/users/:owner_id/migrations",
            get(migrations_handler::<R>),
        )
        .route("/api/v1/derive", post(derive_handler))
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path(owner_id): Path<String>,
    axum::Json(request): axum::Json<UpdateRequest>,
) -> Response
where
    R: ClientRepository + 'static,
{
    let owner = OwnerId(owner_id);
    match service.create(&owner, request.updates) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: ClientRepository + 'static,
{
    match service.list(&OwnerId(owner_id)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path((owner_id, client_id)): Path<(String, String)>,
) -> Response
where
    R: ClientRepository + 'static,
{
    match service.get(&OwnerId(owner_id), &ClientId(client_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path((owner_id, client_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<UpdateRequest>,
) -> Response
where
    R: ClientRepository + 'static,
{
    match service.update(&OwnerId(owner_id), &ClientId(client_id), request.updates) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn questionnaire_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path((owner_id, client_id)): Path<(String, String)>,
    axum::Json(questionnaire): axum::Json<Questionnaire>,
) -> Response
where
    R: ClientRepository + 'static,
{
    match service.submit_questionnaire(&OwnerId(owner_id), &ClientId(client_id), questionnaire) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn migrations_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: ClientRepository + 'static,
{
    match service.migrations(&OwnerId(owner_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn derive_handler(axum::Json(client): axum::Json<Client>) -> Response {
    let derived = recompute(&client);
    let patch = DerivedPatch::from_derived(&derived);
    (StatusCode::OK, axum::Json(DeriveResponse { derived, patch })).into_response()
}

fn error_response(error: ClientServiceError) -> Response {
    let status = match &error {
        ClientServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ClientServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ClientServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
