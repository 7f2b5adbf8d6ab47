//! HTTP API server with observability for the restaurant back-office.
//!
//! Provides create/get/update/list endpoints for every resource, the grouped
//! order view and the invoice view, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use document_store::{Deadlines, DocumentStore};
use domain::{EntityService, Food, Invoice, Menu, Order, OrderItem, Table};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{InvoiceAssembler, OrderViewPipeline, Paginator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/tables",
            get(routes::list::<S, Table>).post(routes::tables::create::<S>),
        )
        .route(
            "/tables/{id}",
            get(routes::get::<S, Table>).patch(routes::tables::update::<S>),
        )
        .route(
            "/menus",
            get(routes::list::<S, Menu>).post(routes::menus::create::<S>),
        )
        .route(
            "/menus/{id}",
            get(routes::get::<S, Menu>).patch(routes::menus::update::<S>),
        )
        .route(
            "/foods",
            get(routes::list::<S, Food>).post(routes::foods::create::<S>),
        )
        .route(
            "/foods/{id}",
            get(routes::get::<S, Food>).patch(routes::foods::update::<S>),
        )
        .route(
            "/orders",
            get(routes::list::<S, Order>).post(routes::orders::create::<S>),
        )
        .route(
            "/orders/{id}",
            get(routes::get::<S, Order>).patch(routes::orders::update::<S>),
        )
        .route(
            "/orderItems",
            get(routes::list::<S, OrderItem>).post(routes::order_items::create::<S>),
        )
        .route(
            "/orderItems/{id}",
            get(routes::get::<S, OrderItem>).patch(routes::order_items::update::<S>),
        )
        .route(
            "/orderItems-order/{order_id}",
            get(routes::order_items::by_order::<S>),
        )
        .route(
            "/invoices",
            get(routes::list::<S, Invoice>).post(routes::invoices::create::<S>),
        )
        .route(
            "/invoices/{id}",
            get(routes::invoices::get::<S>).patch(routes::invoices::update::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over one store.
pub fn create_state<S: DocumentStore + Clone + 'static>(
    store: S,
    deadlines: Deadlines,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        entities: EntityService::new(store.clone(), deadlines),
        order_views: OrderViewPipeline::new(store.clone(), deadlines.aggregate),
        invoices: InvoiceAssembler::new(
            OrderViewPipeline::new(store.clone(), deadlines.aggregate),
            deadlines.read,
        ),
        paginator: Paginator::new(store, deadlines.aggregate),
    })
}
