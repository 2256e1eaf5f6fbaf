use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::ordering_controller::OrderingController;
use crate::dto::ordering_dto::{CommitResponse, OrderingResponse, SetRankRequest, SetRankResponse};
use crate::dto::ApiResponse;
use crate::models::{LocationId, RouteId};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ordering_router() -> Router<AppState> {
    Router::new()
        .route("/routes/:id/ordering", get(view_ordering))
        .route("/routes/:id/ordering/apply", post(apply_ordering))
        .route("/routes/:id/ordering/cancel", post(cancel_ordering))
        .route("/routes/:id/order", delete(reset_order))
        .route("/routes/:id/ranks/:location_id", put(set_rank))
}

async fn view_ordering(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<OrderingResponse>, AppError> {
    let controller = OrderingController::new(state);
    let response = controller.view(id).await?;
    Ok(Json(response))
}

async fn set_rank(
    State(state): State<AppState>,
    Path((id, location_id)): Path<(RouteId, LocationId)>,
    Json(request): Json<SetRankRequest>,
) -> Result<Json<SetRankResponse>, AppError> {
    let controller = OrderingController::new(state);
    let response = controller.set_rank(id, location_id, request).await?;
    Ok(Json(response))
}

async fn apply_ordering(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<ApiResponse<CommitResponse>>, AppError> {
    let controller = OrderingController::new(state);
    let response = controller.apply(id).await?;
    Ok(Json(response))
}

async fn cancel_ordering(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<OrderingResponse>, AppError> {
    let controller = OrderingController::new(state);
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}

async fn reset_order(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<OrderingResponse>, AppError> {
    let controller = OrderingController::new(state);
    let response = controller.reset(id).await?;
    Ok(Json(response))
}
