use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use dispatch_board::api::rest::router;
use dispatch_board::board::seed::{demo_board, roster};
use dispatch_board::board::OrderBoard;
use dispatch_board::state::{AppState, StateOptions};
use serde_json::{json, Value};
use tower::ServiceExt;

fn shared_state(board: OrderBoard) -> Arc<AppState> {
    Arc::new(AppState::new(
        board,
        StateOptions {
            ingest_delay: Duration::from_millis(50),
            ingest_seed: Some(7),
            ..StateOptions::default()
        },
    ))
}

fn setup() -> axum::Router {
    router(shared_state(demo_board(Utc::now()).unwrap()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    empty_request("GET", uri)
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn invoices(table: &Value) -> Vec<String> {
    table["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["invoice"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["drivers"], 3);
    assert_eq!(body["orders"], 5);
    assert_eq!(body["ingest_in_flight"], false);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let app = setup();
    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("board_orders"));
    assert!(body.contains("ingest_in_flight"));
}

#[tokio::test]
async fn list_drivers_returns_roster() {
    let app = setup();
    let response = app.oneshot(get_request("/drivers")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let drivers = body.as_array().unwrap();
    assert_eq!(drivers.len(), 3);
    assert_eq!(drivers[0]["name"], "Alice");
    assert_eq!(drivers[0]["code"], "D1");
    assert_eq!(drivers[2]["cell"], "555-123-4567");
}

#[tokio::test]
async fn get_order_returns_flat_status() {
    let app = setup();
    let response = app.oneshot(get_request("/orders/103")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["invoice"], "INV003");
    assert_eq!(body["status"], "Assigned");
    assert_eq!(body["driver_id"], 2);
    assert!(body.get("delivered_at").is_none());
}

#[tokio::test]
async fn get_nonexistent_order_returns_404() {
    let app = setup();
    let response = app.oneshot(get_request("/orders/9999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn board_views_are_sorted() {
    let app = setup();
    let response = app.oneshot(get_request("/board")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["unassigned"]["count"], 2);
    assert_eq!(invoices(&body["unassigned"]), vec!["INV002", "INV005"]);
    assert_eq!(invoices(&body["assigned"]), vec!["INV001", "INV003"]);
    assert_eq!(invoices(&body["delivered"]), vec!["INV004"]);

    let row = &body["unassigned"]["rows"][0];
    assert_eq!(row["priority"], "Urgent");
    assert_eq!(row["total"], "$75.50");
    assert_eq!(row["warehouses"], "WH3, WH5");
    assert_eq!(row["action"]["kind"], "Assign");
    assert_eq!(row["action"]["drivers"].as_array().unwrap().len(), 3);

    let delivered = &body["delivered"]["rows"][0];
    assert_eq!(delivered["action"]["kind"], "Delivered");
    assert_eq!(delivered["action"]["driver"], "Alice");
}

#[tokio::test]
async fn full_dispatch_flow() {
    let state = shared_state(demo_board(Utc::now()).unwrap());
    let app = router(state.clone());
    let before_assign = Utc::now();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders/105/assign",
            json!({ "driver_id": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order = body_json(res).await;
    assert_eq!(order["status"], "Assigned");
    assert_eq!(order["driver_id"], 2);
    assert_eq!(order["total"], "180.00");

    let res = app.clone().oneshot(get_request("/board")).await.unwrap();
    let board = body_json(res).await;
    assert_eq!(invoices(&board["unassigned"]), vec!["INV002"]);
    assert_eq!(
        invoices(&board["assigned"]),
        vec!["INV001", "INV003", "INV005"]
    );

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/orders/105/deliver"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order = body_json(res).await;
    assert_eq!(order["status"], "Delivered");
    assert_eq!(order["driver_id"], 2);
    let delivered_at: DateTime<Utc> =
        serde_json::from_value(order["delivered_at"].clone()).unwrap();
    assert!(delivered_at >= before_assign);

    let res = app.clone().oneshot(get_request("/board")).await.unwrap();
    let board = body_json(res).await;
    assert_eq!(invoices(&board["delivered"]), vec!["INV005", "INV004"]);
    assert_eq!(invoices(&board["assigned"]), vec!["INV001", "INV003"]);

    let res = app.oneshot(get_request("/notification")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let notice = body_json(res).await;
    assert_eq!(notice["message"], "Order INV005 marked as delivered.");
}

#[tokio::test]
async fn invalid_transitions_return_conflict() {
    let app = setup();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders/101/assign",
            json!({ "driver_id": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("Assigned"));

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/orders/102/deliver"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/orders/104/deliver"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.oneshot(get_request("/orders/101")).await.unwrap();
    let order = body_json(res).await;
    assert_eq!(order["driver_id"], 1);
}

#[tokio::test]
async fn transitions_on_missing_order_return_404_and_change_nothing() {
    let state = shared_state(demo_board(Utc::now()).unwrap());
    let app = router(state.clone());
    let before = state.board.read().await.orders().to_vec();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders/999/assign",
            json!({ "driver_id": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .oneshot(empty_request("POST", "/orders/999/deliver"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(state.board.read().await.orders(), before.as_slice());
}

#[tokio::test]
async fn assigning_unknown_driver_returns_400() {
    let app = setup();
    let res = app
        .oneshot(json_request(
            "POST",
            "/orders/102/assign",
            json!({ "driver_id": 42 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notification_is_empty_before_any_action() {
    let app = setup();
    let res = app.oneshot(get_request("/notification")).await.unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn fetch_is_accepted_once_and_lands_after_delay() {
    let state = shared_state(OrderBoard::new(roster()).unwrap());
    let app = router(state.clone());

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let ticket = body_json(res).await;
    assert!(ticket["id"].as_str().unwrap().len() > 0);

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.clone().oneshot(get_request("/ingest")).await.unwrap();
    let status = body_json(res).await;
    assert_eq!(status["busy"], true);
    assert_eq!(status["pending"]["id"], ticket["id"]);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let res = app.clone().oneshot(get_request("/orders")).await.unwrap();
    let orders = body_json(res).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[0]["invoice"], "INV001");
    assert_eq!(orders[0]["status"], "Unassigned");

    let res = app.clone().oneshot(get_request("/ingest")).await.unwrap();
    let status = body_json(res).await;
    assert_eq!(status["busy"], false);
    assert!(status["pending"].is_null());

    let res = app.oneshot(get_request("/notification")).await.unwrap();
    let notice = body_json(res).await;
    assert_eq!(notice["message"], "Fetched 1 new order (Invoice INV001).");
}

#[tokio::test]
async fn cancelled_fetch_adds_nothing() {
    let state = shared_state(OrderBoard::new(roster()).unwrap());
    let app = router(state.clone());

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let ticket = body_json(res).await;

    let res = app
        .clone()
        .oneshot(empty_request("DELETE", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["cancelled"]["id"], ticket["id"]);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(state.board.read().await.is_empty());

    let res = app
        .oneshot(empty_request("DELETE", "/ingest"))
        .await
        .unwrap();
    let body = body_json(res).await;
    assert!(body["cancelled"].is_null());
}

#[tokio::test]
async fn html_page_renders_tables() {
    let app = setup();
    let res = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let page = body_string(res).await;
    assert!(page.contains("id=\"unassigned-table\""));
    assert!(page.contains("id=\"assigned-table\""));
    assert!(page.contains("id=\"delivered-table\""));
    assert!(page.contains("<span id=\"unassigned-count\">2</span>"));
    assert!(page.contains(">Fetch New Orders</button>"));
}

#[tokio::test]
async fn html_forms_drive_transitions_and_redirect() {
    let state = shared_state(demo_board(Utc::now()).unwrap());
    let app = router(state.clone());

    let res = app
        .clone()
        .oneshot(form_request("/board/orders/102/assign", "driver_id=3"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/");

    let res = app
        .clone()
        .oneshot(form_request("/board/orders/102/deliver", ""))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let board = state.board.read().await;
    assert_eq!(board.delivered().invoices(), vec!["INV002", "INV004"]);
    drop(board);

    let res = app.oneshot(get_request("/")).await.unwrap();
    let page = body_string(res).await;
    assert!(page.contains("Order INV002 marked as delivered."));
    assert!(page.contains("<span id=\"delivered-count\">2</span>"));
}

#[tokio::test]
async fn html_fetch_during_fetch_redirects_back_to_page() {
    let state = shared_state(OrderBoard::new(roster()).unwrap());
    let app = router(state.clone());

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = app
        .clone()
        .oneshot(form_request("/board/fetch", ""))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/");

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/ingest"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.oneshot(get_request("/")).await.unwrap();
    let page = body_string(res).await;
    assert!(page.contains(" disabled>Fetching...</button>"));
    assert!(page.contains("<meta http-equiv=\"refresh\" content=\"1\">"));
}
