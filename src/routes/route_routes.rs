use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::location_controller::LocationController;
use crate::controllers::route_controller::RouteController;
use crate::dto::location_dto::{CreateLocationRequest, LocationResponse};
use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::dto::ApiResponse;
use crate::models::RouteId;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/routes", get(list_routes).post(create_route))
        .route(
            "/routes/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route(
            "/routes/:id/locations",
            get(list_locations).post(create_location),
        )
}

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state);
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}

async fn list_locations(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    let controller = LocationController::new(state);
    let response = controller.list_by_route(id).await?;
    Ok(Json(response))
}

async fn create_location(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<ApiResponse<LocationResponse>>, AppError> {
    let controller = LocationController::new(state);
    let response = controller.create(id, request).await?;
    Ok(Json(response))
}
