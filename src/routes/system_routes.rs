use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::changelog_dto::ChangelogQuery;
use crate::dto::edit_mode_dto::{VerifyPassphraseRequest, VerifyPassphraseResponse};
use crate::dto::ordering_dto::OriginResponse;
use crate::middleware::edit_gate::passphrase_matches;
use crate::models::{ChangelogEntry, RouteId};
use crate::repositories::ChangelogRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_system_router() -> Router<AppState> {
    Router::new()
        .route("/origin", get(get_origin))
        .route("/changelog", get(list_changelog))
        .route("/edit-mode/verify", post(verify_passphrase))
}

async fn get_origin(State(state): State<AppState>) -> Json<OriginResponse> {
    let origin = &state.config.origin;
    Json(OriginResponse::new(&origin.code, origin.coordinates))
}

async fn list_changelog(
    State(state): State<AppState>,
    Query(query): Query<ChangelogQuery>,
) -> Result<Json<Vec<ChangelogEntry>>, AppError> {
    let entries = state
        .repository
        .list_changes(query.route_id.map(RouteId::from), query.include_archived)
        .await?;
    Ok(Json(entries))
}

async fn verify_passphrase(
    State(state): State<AppState>,
    Json(request): Json<VerifyPassphraseRequest>,
) -> Json<VerifyPassphraseResponse> {
    let expected = state.config.edit_passphrase.as_deref();
    Json(VerifyPassphraseResponse {
        valid: passphrase_matches(expected, Some(&request.passphrase)),
        required: expected.is_some(),
    })
}
