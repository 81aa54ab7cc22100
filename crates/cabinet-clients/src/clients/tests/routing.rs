use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::clients::domain::{Client, ClientId};
use crate::clients::repository::ClientRepository;
use crate::clients::router::{client_router, create_handler, fetch_handler, UpdateRequest};
use crate::clients::service::ClientService;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn create_route_returns_created_view() {
    let (service, _) = build_service();
    let router = client_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/users/user-42/clients",
            json!({
                "updates": [
                    { "type": "set_raison_sociale", "value": "Smith Enterprises" }
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["client"]["raisonSociale"], "Smith Enterprises");
    assert_eq!(payload["client"]["activites"]["regimeTVA"], "Débit");
    assert_eq!(
        payload["client"]["obligationsLegales"]["niveauObligation"],
        "Intermédiaire"
    );
    assert_eq!(payload["derived"]["maturity"]["level"], "À définir");
}

#[tokio::test]
async fn create_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(ClientService::new(Arc::new(ConflictRepository)));

    let response = create_handler::<ConflictRepository>(
        State(service),
        Path("user-42".to_string()),
        axum::Json(UpdateRequest::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn fetch_handler_returns_not_found_for_unknown_client() {
    let (service, _) = build_service();

    let response = fetch_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path(("user-42".to_string(), "client_missing".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "record not found");
}

#[tokio::test]
async fn list_route_returns_internal_error_when_store_is_down() {
    let service = ClientService::new(Arc::new(UnavailableRepository));
    let router = client_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/users/user-42/clients")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn patch_and_questionnaire_routes_update_derived_copy() {
    let (service, repository) = build_service();
    let service = Arc::new(service);
    let id = service
        .create(&owner(), smith_updates())
        .expect("create")
        .client
        .id;
    let router = client_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/users/user-42/clients/{}", id.0),
            json!({
                "updates": [
                    { "type": "set_typologie_clientele", "value": "Mixtes" }
                ]
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["derived"]["obligationScore"]["score"], 4);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/users/user-42/clients/{}/questionnaire", id.0),
            serde_json::to_value(form_questionnaire()).expect("serializes"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = repository.stored(&owner(), &id).expect("stored");
    assert_eq!(
        stored.cartographie_client.as_deref(),
        Some("priorité intermédiaire - clients à opportunités émergentes")
    );
    assert_eq!(
        stored.obligations_legales.niveau_obligation.as_deref(),
        Some("Fortes")
    );
}

#[tokio::test]
async fn migrations_route_lists_enrolled_clients() {
    let (service, _) = build_service();
    service
        .import(&owner(), vec![migration_client("client_a")])
        .expect("import");
    let router = client_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/users/user-42/migrations")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["progress"]["total"], 9);
}

#[tokio::test]
async fn derive_route_is_stateless() {
    let (service, repository) = build_service();
    let router = client_router(Arc::new(service));

    let mut client = Client::empty(ClientId("client_posted".to_string()));
    client.activites.regime_tva = "Non concerné".to_string();
    client.activites.typologie_clientele = "B to C".to_string();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/derive",
            serde_json::to_value(&client).expect("serializes"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["patch"]["obligationsLegales"]["assujettiReforme"], "Non");
    assert_eq!(payload["patch"]["obligationsLegales"]["niveauObligation"], "Faibles");
    assert_eq!(payload["patch"]["maturiteDigitale"], "À définir");
    assert!(repository.list(&owner()).expect("list").is_empty());
}

#[tokio::test]
async fn derive_route_treats_null_inputs_as_unset() {
    let (service, _) = build_service();
    let router = client_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/derive",
            json!({
                "id": "client_posted",
                "siren": null,
                "activites": { "regimeTVA": null, "typologieClientele": null },
                "actionsAMener": "Migration sur l'outil du cabinet"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["derived"]["obligationScore"]["score"], 0);
    assert_eq!(payload["derived"]["obligationScore"]["level"], "À définir");
    assert_eq!(payload["derived"]["obligations"]["eReportingPaiement"], "Non");
    assert_eq!(payload["derived"]["cartographie"], "À définir");
}
