//! Routers de la API
//! 
//! Cada recurso expone su propio router; aquí se combinan bajo `/api`.

pub mod route_routes;
pub mod location_routes;
pub mod ordering_routes;
pub mod preset_routes;
pub mod system_routes;

use axum::Router;

use crate::state::AppState;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(route_routes::create_route_router())
        .merge(location_routes::create_location_router())
        .merge(ordering_routes::create_ordering_router())
        .merge(preset_routes::create_preset_router())
        .merge(system_routes::create_system_router())
}
