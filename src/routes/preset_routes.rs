use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};

use crate::controllers::preset_controller::PresetController;
use crate::dto::preset_dto::{PresetSessionResponse, SavePresetRequest, SavePresetResponse};
use crate::dto::ApiResponse;
use crate::models::{PresetId, RouteId, SortPreset};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_preset_router() -> Router<AppState> {
    Router::new()
        .route("/routes/:id/presets", get(list_presets).post(save_preset))
        .route("/routes/:id/presets/:preset_id/preview", post(preview_preset))
        .route("/routes/:id/presets/:preset_id/edit", post(edit_preset))
        .route("/presets/:preset_id/visibility", patch(toggle_visibility))
        .route("/presets/:preset_id", delete(delete_preset))
}

async fn list_presets(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<Vec<SortPreset>>, AppError> {
    let controller = PresetController::new(state);
    let response = controller.list(id).await?;
    Ok(Json(response))
}

async fn save_preset(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(request): Json<SavePresetRequest>,
) -> Result<Json<ApiResponse<SavePresetResponse>>, AppError> {
    let controller = PresetController::new(state);
    let response = controller.save(id, request).await?;
    Ok(Json(response))
}

async fn preview_preset(
    State(state): State<AppState>,
    Path((id, preset_id)): Path<(RouteId, PresetId)>,
) -> Result<Json<PresetSessionResponse>, AppError> {
    let controller = PresetController::new(state);
    let response = controller.preview(id, preset_id).await?;
    Ok(Json(response))
}

async fn edit_preset(
    State(state): State<AppState>,
    Path((id, preset_id)): Path<(RouteId, PresetId)>,
) -> Result<Json<PresetSessionResponse>, AppError> {
    let controller = PresetController::new(state);
    let response = controller.edit(id, preset_id).await?;
    Ok(Json(response))
}

async fn toggle_visibility(
    State(state): State<AppState>,
    Path(preset_id): Path<PresetId>,
) -> Result<Json<SortPreset>, AppError> {
    let controller = PresetController::new(state);
    let response = controller.toggle_visibility(preset_id).await?;
    Ok(Json(response))
}

async fn delete_preset(
    State(state): State<AppState>,
    Path(preset_id): Path<PresetId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = PresetController::new(state);
    let preset = controller.delete(preset_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Preset '{}' eliminado", preset.name)
    })))
}
