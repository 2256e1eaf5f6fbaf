use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};

use crate::controllers::location_controller::LocationController;
use crate::dto::location_dto::{
    AddImagesRequest, LocationResponse, RemoveImageRequest, UpdateLocationRequest,
};
use crate::dto::ApiResponse;
use crate::models::LocationId;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router() -> Router<AppState> {
    Router::new()
        .route("/locations/:id", put(update_location).delete(delete_location))
        .route("/locations/:id/images", post(add_images).delete(remove_image))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<LocationResponse>>, AppError> {
    let controller = LocationController::new(state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = LocationController::new(state);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ubicación eliminada exitosamente"
    })))
}

async fn add_images(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
    Json(request): Json<AddImagesRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let controller = LocationController::new(state);
    let response = controller.add_images(id, request).await?;
    Ok(Json(response))
}

async fn remove_image(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
    Json(request): Json<RemoveImageRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let controller = LocationController::new(state);
    let response = controller.remove_image(id, request).await?;
    Ok(Json(response))
}
