use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use fueleu::{
    adapters::InMemoryStore,
    api::{create_router, AppState},
    domain::ComplianceParams,
    services::Services,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:5173";

fn app() -> Router {
    let services = Services::new(
        Arc::new(InMemoryStore::with_seed()),
        ComplianceParams::default(),
    );
    create_router(AppState::new(services), ORIGIN).expect("router")
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);
    let request = if let Some(payload) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("failed to build json request")
    } else {
        request_builder
            .body(Body::empty())
            .expect("failed to build empty request")
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not json")
    };

    (status, body)
}

fn ship_ids(data: &Value) -> Vec<String> {
    data.as_array()
        .expect("array")
        .iter()
        .map(|v| {
            v.get("shipId")
                .or_else(|| v.get("routeId"))
                .and_then(Value::as_str)
                .expect("id")
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send_json(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn routes_list_and_filter() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/routes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 5);
    assert_eq!(
        ship_ids(&body["data"]),
        vec!["R001", "R002", "R003", "R004", "R005"]
    );
    assert_eq!(body["data"][3]["isBaseline"], true);
    assert_eq!(body["data"][0]["ghgIntensity"].as_f64(), Some(91.0));

    let (_, body) = send_json(&app, Method::GET, "/api/routes?vesselType=Container", None).await;
    assert_eq!(ship_ids(&body["data"]), vec!["R001", "R005"]);

    let (_, body) = send_json(&app, Method::GET, "/api/routes?year=2025&fuelType=LNG", None).await;
    assert_eq!(ship_ids(&body["data"]), vec!["R005"]);

    let (status, body) = send_json(&app, Method::GET, "/api/routes?year=soon", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn comparison_against_seeded_baseline() {
    let (status, body) = send_json(&app(), Method::GET, "/api/routes/comparison", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ship_ids(&body["data"]), vec!["R001", "R002", "R003", "R005"]);

    let r001 = &body["data"][0];
    assert_eq!(r001["baselineIntensity"].as_f64(), Some(89.2));
    assert_eq!(r001["percentDiff"].as_f64(), Some(2.02));
    assert_eq!(r001["compliant"], false);

    let r002 = &body["data"][1];
    assert_eq!(r002["percentDiff"].as_f64(), Some(-1.35));
    assert_eq!(r002["compliant"], true);
}

#[tokio::test]
async fn switching_baseline_changes_comparison() {
    let app = app();

    let (status, body) = send_json(&app, Method::POST, "/api/routes/R001/baseline", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["routeId"], "R001");
    assert_eq!(body["data"]["isBaseline"], true);

    let (_, body) = send_json(&app, Method::GET, "/api/routes/comparison", None).await;
    assert_eq!(ship_ids(&body["data"]), vec!["R002", "R003", "R004", "R005"]);

    let (_, body) = send_json(&app, Method::GET, "/api/routes", None).await;
    let baselines: Vec<&Value> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["isBaseline"] == true)
        .collect();
    assert_eq!(baselines.len(), 1);
}

#[tokio::test]
async fn unknown_baseline_is_404() {
    let (status, body) = send_json(&app(), Method::POST, "/api/routes/R999/baseline", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route with ID R999 not found");
}

#[tokio::test]
async fn adjusted_cb_for_2024() {
    let (status, body) =
        send_json(&app(), Method::GET, "/api/compliance/adjusted-cb?year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["count"], 3);
    assert_eq!(ship_ids(&body["data"]), vec!["R001", "R002", "R003"]);
    assert_eq!(body["data"][0]["cb_before"].as_f64(), Some(-340956000.0));
    assert_eq!(body["data"][1]["cb_before"].as_f64(), Some(263082240.0));
    assert_eq!(body["data"][1]["vesselType"], "BulkCarrier");
    assert_eq!(body["data"][2]["cb_before"].as_f64(), Some(-870525120.0));
}

#[tokio::test]
async fn adjusted_cb_year_validation() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/compliance/adjusted-cb", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required query parameter: year");

    let (status, body) =
        send_json(&app, Method::GET, "/api/pools/adjusted-cb?year=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid year parameter. Must be a number.");

    let (status, body) =
        send_json(&app, Method::GET, "/api/compliance/adjusted-cb?year=1999", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Year must be between 2020 and 2100");

    let (status, body) =
        send_json(&app, Method::GET, "/api/pools/adjusted-cb?year=2030", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn create_pool_redistributes_and_persists() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({
            "year": 2024,
            "members": [
                { "shipId": "S3", "cb_before": -40 },
                { "shipId": "S1", "cb_before": 70 },
                { "shipId": "S2", "cb_before": -20 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["totalCB"].as_f64(), Some(10.0));
    assert_eq!(ship_ids(&body["members"]), vec!["S1", "S2", "S3"]);
    assert_eq!(body["members"][0]["cb_after"].as_f64(), Some(10.0));
    assert_eq!(body["members"][1]["cb_after"].as_f64(), Some(0.0));
    assert_eq!(body["members"][2]["cb_after"].as_f64(), Some(0.0));
    assert_eq!(body["members"][2]["cb_before"].as_f64(), Some(-40.0));

    let pool_id = body["poolId"].as_i64().expect("pool id");
    let (status, fetched) =
        send_json(&app, Method::GET, &format!("/api/pools/{pool_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["members"], body["members"]);
    assert_eq!(fetched["totalCB"], body["totalCB"]);
}

#[tokio::test]
async fn create_pool_rounds_half_away_from_zero() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/pools",
        Some(json!({ "year": 2025, "members": [{ "shipId": "A", "cb_before": 12.345 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["members"][0]["cb_before"].as_f64(), Some(12.35));
    assert_eq!(body["members"][0]["cb_after"].as_f64(), Some(12.35));
}

#[tokio::test]
async fn create_pool_rejects_invalid_members() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({
            "year": 2024,
            "members": [
                { "shipId": "R001", "cb_before": -340956000 },
                { "shipId": "R002", "cb_before": 263082240 },
                { "shipId": "R003", "cb_before": -870525120 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Pool invalid: total adjusted CB must be >= 0. Current total: -948398880.00"
    );

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({ "year": 2024, "members": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Pool must have at least one member");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({
            "year": 2024,
            "members": [
                { "shipId": "A", "cb_before": 5 },
                { "shipId": "A", "cb_before": 1 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Duplicate shipId in pool: A");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({ "year": 2024, "members": [{ "shipId": "A" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn create_pool_rejects_total_beyond_decimal_range() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pools",
        Some(json!({
            "year": 2024,
            "members": [
                { "shipId": "A", "cb_before": 5e28 },
                { "shipId": "B", "cb_before": 5e28 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Pool total is out of range");

    // the server keeps serving after the rejected request
    let (status, _) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_pool_is_404_and_bad_id_is_400() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/pools/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pool with ID 999 not found");

    let (status, _) = send_json(&app, Method::GET, "/api/pools/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn banking_flow() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/bank",
        Some(json!({ "shipId": "R002", "year": 2024, "amount": 1500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Banked successfully");
    assert_eq!(body["result"]["shipId"], "R002");
    assert_eq!(body["result"]["amount"].as_f64(), Some(1500.0));

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/apply",
        Some(json!({ "shipId": "R002", "year": 2025, "applyAmount": 600 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cb_before"].as_f64(), Some(1500.0));
    assert_eq!(body["applied"].as_f64(), Some(600.0));
    assert_eq!(body["cb_after"].as_f64(), Some(900.0));

    let (status, body) =
        send_json(&app, Method::GET, "/api/banking/R002/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shipId"], "R002");
    assert_eq!(body["balance"].as_f64(), Some(900.0));

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/apply",
        Some(json!({ "shipId": "R002", "year": 2025, "applyAmount": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Insufficient banked balance. Available: 900, Requested: 1000"
    );

    let (_, body) = send_json(&app, Method::GET, "/api/banking/R002/balance", None).await;
    assert_eq!(body["balance"].as_f64(), Some(900.0));
}

#[tokio::test]
async fn banking_rejects_bad_requests() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/bank",
        Some(json!({ "shipId": "GHOST", "year": 2024, "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ship with ID GHOST not found");

    // unknown ship wins over a bad amount
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/bank",
        Some(json!({ "shipId": "GHOST", "year": 2024, "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ship with ID GHOST not found");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/bank",
        Some(json!({ "shipId": "R002", "year": 2024, "amount": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bank amount must be positive");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/banking/apply",
        Some(json!({ "shipId": "R002", "year": 2024 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send_json(&app, Method::GET, "/api/banking/NOBODY/balance", None).await;
    assert_eq!(body["balance"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/pools")
        .header("origin", ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .expect("failed to build preflight request");

    let response = app().oneshot(request).await.expect("router request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
}
