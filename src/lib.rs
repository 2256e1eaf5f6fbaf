//! Servicio de orden de paradas por ruta
//! 
//! Expone por HTTP las rutas de reparto, sus ubicaciones y el orden
//! personalizado que el operador asigna con rangos numéricos, junto con
//! los presets de orden guardados y el historial de cambios.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_middleware;
use middleware::edit_gate::edit_gate;
use state::AppState;

/// Construye la aplicación completa con su estado
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::create_api_router())
        .layer(from_fn_with_state(state.clone(), edit_gate))
        .layer(cors_middleware(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "route-ordering",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
