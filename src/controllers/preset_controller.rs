use tracing::info;

use crate::dto::preset_dto::{PresetSessionResponse, SavePresetRequest, SavePresetResponse};
use crate::dto::ApiResponse;
use crate::models::{ChangeAction, PresetId, RouteId, SortPreset};
use crate::repositories::{Repository, RouteRepository};
use crate::services::changelog_service;
use crate::services::preset_store::PresetStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct PresetController {
    state: AppState,
}

impl PresetController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn store(&self) -> PresetStore<'_, dyn Repository> {
        PresetStore::new(self.state.repository.as_ref())
    }

    pub async fn list(&self, route_id: RouteId) -> AppResult<Vec<SortPreset>> {
        if self.state.repository.get_route(route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id.to_string()));
        }
        self.store().list(route_id).await
    }

    /// Guarda la tabla de rangos en edición. Si se estaba editando un preset,
    /// lo reemplaza en el mismo registro.
    pub async fn save(
        &self,
        route_id: RouteId,
        request: SavePresetRequest,
    ) -> AppResult<ApiResponse<SavePresetResponse>> {
        let mut session = self.state.session(route_id).await?;
        let route = self
            .state
            .repository
            .get_route(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))?;

        let store = self.store();
        let (preset, replaced) = match session.editing_preset() {
            Some(preset_id) => {
                let preset = store
                    .replace(preset_id, &request.name, session.ranks(), request.is_public)
                    .await?;
                session.finish_edit();
                (preset, true)
            }
            None => {
                let preset = store
                    .save(&route, &request.name, session.ranks(), request.is_public)
                    .await?;
                (preset, false)
            }
        };

        let action = if replaced {
            ChangeAction::PresetReplaced
        } else {
            ChangeAction::PresetSaved
        };
        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route_id),
            action,
            format!("Preset '{}'", preset.name),
        )
        .await;

        Ok(ApiResponse::success_with_message(
            SavePresetResponse { preset, replaced },
            "Preset guardado exitosamente".to_string(),
        ))
    }

    /// Carga el preset en la sesión sin confirmarlo
    pub async fn preview(&self, route_id: RouteId, preset_id: PresetId) -> AppResult<PresetSessionResponse> {
        let mut session = self.state.session(route_id).await?;
        let preset = self.store().get(preset_id).await?;
        session.apply_preview(&preset)?;

        Ok(PresetSessionResponse {
            session: session.mode(),
            ranks: session.ranks().clone(),
            preset,
        })
    }

    /// Carga el preset para editarlo; el registro original se conserva
    pub async fn edit(&self, route_id: RouteId, preset_id: PresetId) -> AppResult<PresetSessionResponse> {
        let mut session = self.state.session(route_id).await?;
        let preset = self.store().get(preset_id).await?;
        session.begin_edit(&preset)?;
        info!("📝 Editando preset '{}'", preset.name);

        Ok(PresetSessionResponse {
            session: session.mode(),
            ranks: session.ranks().clone(),
            preset,
        })
    }

    pub async fn toggle_visibility(&self, preset_id: PresetId) -> AppResult<SortPreset> {
        let preset = self.store().toggle_visibility(preset_id).await?;
        changelog_service::record(
            self.state.repository.as_ref(),
            Some(preset.route_id),
            ChangeAction::PresetVisibilityChanged,
            format!(
                "Preset '{}' ahora es {}",
                preset.name,
                if preset.is_public { "público" } else { "privado" }
            ),
        )
        .await;
        Ok(preset)
    }

    /// Borra el preset y sale de preview/edición si era el activo
    pub async fn delete(&self, preset_id: PresetId) -> AppResult<SortPreset> {
        let preset = self.store().delete(preset_id).await?;
        let mut session = self.state.session(preset.route_id).await?;
        if session.preset_deleted(preset_id) {
            info!("👀 Preview del preset '{}' cerrado", preset.name);
        }

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(preset.route_id),
            ChangeAction::PresetDeleted,
            format!("Preset '{}' eliminado", preset.name),
        )
        .await;
        Ok(preset)
    }
}
