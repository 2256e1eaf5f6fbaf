use tracing::{info, warn};

use crate::dto::ordering_dto::{
    CommitResponse, OrderedLocation, OrderingResponse, OriginResponse, SetRankRequest,
    SetRankResponse,
};
use crate::dto::ApiResponse;
use crate::models::{ChangeAction, Location, LocationId, RouteId};
use crate::repositories::RouteRepository;
use crate::services::changelog_service;
use crate::services::distance_annotator::annotate;
use crate::services::ordering_session::{OrderingSession, SessionTransition};
use crate::services::preset_store::PresetStore;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct OrderingController {
    state: AppState,
}

impl OrderingController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Orden mostrado con distancias, rangos y marcas de duplicado
    fn build_view(&self, session: &OrderingSession, locations: &[Location]) -> OrderingResponse {
        let origin = &self.state.config.origin;
        let shown = session.displayed(locations);
        let distance_mode = session.distance_mode();
        let annotations = annotate(&shown, origin.coordinates, distance_mode);
        let ranks = session.ranks();

        let rows = shown
            .iter()
            .zip(annotations)
            .enumerate()
            .map(|(position, (location, annotation))| {
                let rank = ranks.get(&location.id);
                OrderedLocation {
                    position: position + 1,
                    location_id: location.id,
                    code: location.code.clone(),
                    name: location.name.clone(),
                    rank,
                    duplicate_rank: ranks.is_duplicate(&location.id, rank),
                    cumulative_distance_km: annotation.cumulative_distance_km,
                    segment_distance_km: annotation.segment_distance_km,
                }
            })
            .collect();

        OrderingResponse {
            route_id: session.route_id(),
            session: session.mode(),
            distance_mode,
            has_custom_order: session.has_custom_order(),
            can_apply: ranks.has_any_rank(),
            origin: OriginResponse::new(&origin.code, origin.coordinates),
            locations: rows,
        }
    }

    pub async fn view(&self, route_id: RouteId) -> AppResult<OrderingResponse> {
        let session = self.state.session(route_id).await?;
        let locations = self.state.repository.list_locations(route_id).await?;
        Ok(self.build_view(&session, &locations))
    }

    pub async fn set_rank(
        &self,
        route_id: RouteId,
        location_id: LocationId,
        request: SetRankRequest,
    ) -> AppResult<SetRankResponse> {
        let mut session = self.state.session(route_id).await?;
        let locations = self.state.repository.list_locations(route_id).await?;

        let update = session.set_rank(location_id, &request.value, &locations)?;
        let ranks = session.ranks();
        let rank = ranks.get(&location_id);

        Ok(SetRankResponse {
            location_id,
            update: update.into(),
            rank,
            duplicate_rank: ranks.is_duplicate(&location_id, rank),
            can_apply: ranks.has_any_rank(),
            ranks: ranks.clone(),
        })
    }

    /// Aplica la tabla de rangos como nuevo orden de la ruta.
    ///
    /// El orden queda aplicado en memoria aunque falle la persistencia; en
    /// ese caso la respuesta lo indica con `persisted: false`.
    pub async fn apply(&self, route_id: RouteId) -> AppResult<ApiResponse<CommitResponse>> {
        let mut session = self.state.session(route_id).await?;
        let locations = self.state.repository.list_locations(route_id).await?;

        let outcome = session.commit(&locations)?;

        let persisted = match self.state.repository.save_order(outcome.order.clone()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ Orden aplicado localmente pero no guardado (ruta {}): {}", route_id, e);
                false
            }
        };

        let synced_preset = match outcome.transition {
            SessionTransition::AutoSyncedPreset(preset_id) => {
                let store = PresetStore::new(self.state.repository.as_ref());
                match store.sync_snapshot(preset_id, &outcome.order.ranks).await {
                    Ok(preset) => Some(preset),
                    Err(e) => {
                        warn!("⚠️ No se pudo sincronizar el preset {}: {}", preset_id, e);
                        None
                    }
                }
            }
            SessionTransition::Committed => None,
        };

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route_id),
            ChangeAction::OrderApplied,
            format!("Orden personalizado aplicado ({} ubicaciones)", outcome.order.location_ids.len()),
        )
        .await;

        let message = if persisted {
            "Orden aplicado exitosamente".to_string()
        } else {
            "Orden aplicado localmente; no se pudo guardar, vuelva a guardar manualmente".to_string()
        };

        Ok(ApiResponse::success_with_message(
            CommitResponse {
                order: outcome.order.location_ids,
                transition: outcome.transition,
                persisted,
                synced_preset,
            },
            message,
        ))
    }

    /// Descarta la edición en curso
    pub async fn cancel(&self, route_id: RouteId) -> AppResult<OrderingResponse> {
        let mut session = self.state.session(route_id).await?;
        session.cancel();
        let locations = self.state.repository.list_locations(route_id).await?;
        Ok(self.build_view(&session, &locations))
    }

    /// Vuelve al orden por defecto (por código)
    pub async fn reset(&self, route_id: RouteId) -> AppResult<OrderingResponse> {
        let mut session = self.state.session(route_id).await?;
        self.state.repository.clear_order(route_id).await?;
        session.reset_order();
        info!("↩️ Orden por defecto restaurado en ruta {}", route_id);

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route_id),
            ChangeAction::OrderReset,
            "Orden por defecto restaurado",
        )
        .await;

        let locations = self.state.repository.list_locations(route_id).await?;
        Ok(self.build_view(&session, &locations))
    }
}
