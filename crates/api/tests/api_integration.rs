//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use document_store::{Collection, Deadlines, ExternalId, InMemoryDocumentStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    setup_with_store().0
}

fn setup_with_store() -> (axum::Router, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    let state = api::create_state(store.clone(), Deadlines::default());
    let app = api::create_app(Arc::clone(&state), get_metrics_handle());
    (app, store)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_table(app: &axum::Router, number: i64) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/tables",
        Some(json!({"number_of_guests": 4, "table_number": number})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["table_id"].as_str().unwrap().to_string()
}

async fn create_food(app: &axum::Router, name: &str, price: f64) -> String {
    let (status, menu) = send(
        app,
        "POST",
        "/menus",
        Some(json!({"name": "Dinner", "category": "main"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, food) = send(
        app,
        "POST",
        "/foods",
        Some(json!({
            "name": name,
            "price": price,
            "food_image": format!("https://img.example/{name}.png"),
            "menu_id": menu["menu_id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    food["food_id"].as_str().unwrap().to_string()
}

/// Opens an order at a fresh table with one line per food; returns the order id.
async fn open_order(app: &axum::Router, table_number: i64, foods: &[&str]) -> String {
    let table_id = create_table(app, table_number).await;
    let lines: Vec<Value> = foods
        .iter()
        .map(|food_id| json!({"food_id": food_id, "quantity": 1}))
        .collect();

    let (status, json) = send(
        app,
        "POST",
        "/orderItems",
        Some(json!({"table_id": table_id, "order_items": lines})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["order_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

mod tables {
    use super::*;

    #[tokio::test]
    async fn create_get_and_patch() {
        let app = setup();
        let id = create_table(&app, 3).await;

        let (status, json) = send(&app, "GET", &format!("/tables/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["table_number"], 3);

        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/tables/{id}"),
            Some(json!({"number_of_guests": 6})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["number_of_guests"], 6);
        assert_eq!(json["table_number"], 3);
    }

    #[tokio::test]
    async fn invalid_guest_count_is_bad_request() {
        let app = setup();
        let (status, json) = send(
            &app,
            "POST",
            "/tables",
            Some(json!({"number_of_guests": 0, "table_number": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("guests"));
    }

    #[tokio::test]
    async fn unknown_table_is_not_found() {
        let app = setup();
        let (status, json) = send(&app, "GET", "/tables/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn patch_of_unknown_table_is_not_found() {
        let (app, store) = setup_with_store();
        let (status, _) = send(
            &app,
            "PATCH",
            "/tables/nope",
            Some(json!({"number_of_guests": 2})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(store.document_count(Collection::Tables).await, 0);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn second_page_of_twenty_five() {
        let app = setup();
        for number in 1..=25 {
            create_table(&app, number).await;
        }

        let (status, json) = send(&app, "GET", "/tables?Page=2&recordperPage=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_count"], 25);

        let numbers: Vec<i64> = json["table_items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["table_number"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, (11..=20).collect::<Vec<_>>());

        let (_, json) = send(&app, "GET", "/tables?Page=3&recordperPage=10", None).await;
        assert_eq!(json["table_items"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn bad_parameters_use_defaults() {
        let app = setup();
        for number in 1..=12 {
            create_table(&app, number).await;
        }

        let (status, json) = send(&app, "GET", "/tables?Page=x&recordperPage=-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_count"], 12);
        assert_eq!(json["table_items"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn start_index_override() {
        let app = setup();
        for number in 1..=12 {
            create_table(&app, number).await;
        }

        let (_, json) = send(
            &app,
            "GET",
            "/tables?Page=1&recordperPage=3&startIndex=10",
            None,
        )
        .await;
        let numbers: Vec<i64> = json["table_items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["table_number"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![11, 12]);
    }

    #[tokio::test]
    async fn empty_collection_omits_total() {
        let app = setup();
        let (status, json) = send(&app, "GET", "/invoices", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.get("total_count").is_none());
        assert_eq!(json["invoice_items"], json!([]));
    }
}

mod order_view {
    use super::*;

    #[tokio::test]
    async fn grouped_view_of_an_order() {
        let app = setup();
        let soup = create_food(&app, "soup", 4.5).await;
        let tea = create_food(&app, "tea", 1.25).await;
        let order_id = open_order(&app, 7, &[&soup, &tea, &tea]).await;

        let (status, json) = send(&app, "GET", &format!("/orderItems-order/{order_id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let groups = json.as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["table_number"], 7);
        assert_eq!(groups[0]["total_count"], 3);
        assert_eq!(groups[0]["payment_due"], 7.0);
        assert_eq!(groups[0]["order_items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn order_without_items_is_empty_list() {
        let app = setup();
        let (_, order) = send(&app, "POST", "/orders", Some(json!({}))).await;
        let order_id = order["order_id"].as_str().unwrap();

        let (status, json) = send(&app, "GET", &format!("/orderItems-order/{order_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn unknown_food_is_bad_request() {
        let app = setup();
        let (status, json) = send(
            &app,
            "POST",
            "/orderItems",
            Some(json!({"order_items": [{"food_id": "ghost", "quantity": 1}]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("ghost"));
    }
}

mod invoices {
    use super::*;

    async fn create_invoice(app: &axum::Router, order_id: &str, method: Option<&str>) -> String {
        let mut body = json!({"order_id": order_id});
        if let Some(method) = method {
            body["payment_method"] = json!(method);
        }
        let (status, json) = send(app, "POST", "/invoices", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["payment_status"], "PENDING");
        json["invoice_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn invoice_view_merges_order_totals() {
        let app = setup();
        let curry = create_food(&app, "curry", 12.005).await;
        let order_id = open_order(&app, 4, &[&curry]).await;
        let invoice_id = create_invoice(&app, &order_id, None).await;

        let (status, json) = send(&app, "GET", &format!("/invoices/{invoice_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["invoice_id"], invoice_id.as_str());
        assert_eq!(json["order_id"], order_id.as_str());
        assert_eq!(json["payment_method"], "unset");
        assert_eq!(json["table_number"], 4);
        assert_eq!(json["payment_due"], 12.01);
        assert_eq!(json["order_details"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn status_patch_keeps_method_and_order() {
        let app = setup();
        let food = create_food(&app, "bao", 3.0).await;
        let order_id = open_order(&app, 2, &[&food]).await;
        let invoice_id = create_invoice(&app, &order_id, Some("CASH")).await;

        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/invoices/{invoice_id}"),
            Some(json!({"payment_status": "PAID"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["payment_status"], "PAID");
        assert_eq!(json["payment_method"], "CASH");
        assert_eq!(json["order_id"], order_id.as_str());
    }

    #[tokio::test]
    async fn unknown_invoice_is_not_found() {
        let app = setup();
        let (status, json) = send(&app, "GET", "/invoices/missing", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn deleted_order_is_internal_error() {
        let (app, store) = setup_with_store();
        let food = create_food(&app, "bao", 3.0).await;
        let order_id = open_order(&app, 2, &[&food]).await;
        let invoice_id = create_invoice(&app, &order_id, Some("CARD")).await;

        store
            .remove(Collection::Orders, &ExternalId::new(order_id.as_str()))
            .await;

        let (status, json) = send(&app, "GET", &format!("/invoices/{invoice_id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains(&order_id));
    }

    #[tokio::test]
    async fn unseated_order_cannot_be_invoiced() {
        let app = setup();
        let (_, order) = send(&app, "POST", "/orders", Some(json!({}))).await;

        let (status, _) = send(
            &app,
            "POST",
            "/invoices",
            Some(json!({"order_id": order["order_id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
