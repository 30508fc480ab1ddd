use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::insurance::quote::QuoteEstimator;
use crate::workflows::insurance::router::get_handler;
use crate::workflows::insurance::InsuranceApplicationService;

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn initialize_route_returns_created_with_identifier() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/post-initialize-application",
            &json!({ "applicationId": APPLICATION_ID, "firstName": "Ada" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["applicationId"], APPLICATION_ID);
}

#[tokio::test]
async fn initialize_route_reports_request_problems() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/post-initialize-application",
            &json!({ "firstName": "Ada" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "applicationId is required." })
    );

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/post-initialize-application",
            &json!({ "applicationId": APPLICATION_ID }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "No valid fields provided for initialization." })
    );
}

#[tokio::test]
async fn initialize_route_returns_conflict_on_duplicate() {
    let service = InsuranceApplicationService::new(
        Arc::new(ConflictRepository),
        QuoteEstimator::default(),
    )
    .with_reference_date(today());
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/post-initialize-application",
            &json!({ "applicationId": APPLICATION_ID, "lastName": "Lovelace" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn complete_route_returns_quote() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/post-complete-application",
            &complete_payload(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["applicationId"], APPLICATION_ID);
    let premium = payload["sixMonthPremium"].as_u64().expect("numeric premium");
    assert!((600..2000).contains(&premium));
    assert!(payload["message"]
        .as_str()
        .expect("message text")
        .starts_with("Thank you for your application."));
}

#[tokio::test]
async fn complete_route_returns_field_errors() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let mut body = complete_payload();
    body["firstName"] = json!("");
    body["addressZipCode"] = json!("ABCDE");
    body["vehicles"] = json!([{}, {}, {}, {}]);

    let response = router
        .oneshot(json_request("POST", "/api/post-complete-application", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["errors"],
        json!([
            "Primary Applicant first name is required.",
            "Primary Applicant zip code must be a valid number.",
            "A policy cannot have more than 3 vehicles."
        ])
    );
    assert_eq!(
        payload["fieldErrors"]["genericErrors"]["vehicles"],
        "A policy cannot have more than 3 vehicles."
    );
    assert_eq!(payload["issues"][0]["field"], "firstName");
    assert_eq!(payload["issues"][0]["kind"]["type"], "required");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/post-complete-application")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"applicationId\": "))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json_body(response).await.get("error").is_some());
}

#[tokio::test]
async fn update_then_get_round_trips_through_routes() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/post-initialize-application",
            &json!({
                "applicationId": APPLICATION_ID,
                "firstName": "Ada",
                "people": [{
                    "firstName": "Grace",
                    "lastName": "Hopper",
                    "dateOfBirth": "1985-12-09",
                    "relationship": "Spouse"
                }]
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/update-application/{APPLICATION_ID}"),
            &json!({ "lastName": "Lovelace", "vehicles": [
                { "vin": "1HGCM82633A123456", "year": 2020, "makeModel": "Honda Accord" }
            ] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get_request(&format!("/api/get-application/{APPLICATION_ID}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "draft");
    assert_eq!(payload["firstName"], "Ada");
    assert_eq!(payload["lastName"], "Lovelace");
    assert_eq!(payload["vehicles"][0]["makeModel"], "Honda Accord");
    assert_eq!(payload["people"][0]["relationship"], "Primary Applicant");
    assert_eq!(payload["people"][0]["lastName"], "Lovelace");
    assert_eq!(payload["people"][1]["relationship"], "Spouse");
}

#[tokio::test]
async fn update_route_validates_and_reports_missing_records() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/update-application/{APPLICATION_ID}"),
            &json!({ "addressCity": "Ames" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/update-application/not-a-uuid",
            &json!({ "addressCity": "Ames" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errors"], json!(["applicationId must be a valid UUID."]));
}

#[tokio::test]
async fn get_handler_returns_not_found_for_unknown_ids() {
    let (service, _) = build_service();
    let response = get_handler(State(Arc::new(service)), Path(APPLICATION_ID.to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Application not found" })
    );
}

#[tokio::test]
async fn repository_outage_returns_internal_error() {
    let router = router_with_service(unavailable_service());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/post-complete-application",
            &complete_payload(),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Internal Server Error" })
    );

    let response = router
        .oneshot(get_request(&format!("/api/get-application/{APPLICATION_ID}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
