//! Sesión de orden de una ruta
//! 
//! Objeto delgado que guarda la tabla de rangos en edición, la última tabla
//! confirmada, el orden aplicado y el modo (edición, preview o edición de
//! preset). Todas las transiciones son explícitas y síncronas.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::models::{Location, LocationId, PresetId, RouteId, RouteOrder, SortPreset};
use crate::services::distance_annotator::DistanceMode;
use crate::services::preset_store::ensure_route;
use crate::services::rank_table::{RankTable, RankUpdate};
use crate::services::sort_resolver::{displayed_order, resolve};
use crate::utils::errors::OrderingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "preset_id", rename_all = "snake_case")]
pub enum SessionMode {
    /// Edición libre de rangos
    Ranking,
    /// Preset cargado sin confirmar; el próximo commit lo sincroniza
    Preview(PresetId),
    /// Preset cargado para editar; el original sigue intacto hasta guardar
    EditingPreset(PresetId),
}

/// Transición producida por un commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", content = "preset_id", rename_all = "snake_case")]
pub enum SessionTransition {
    Committed,
    /// Preview -> AutoSyncOnCommit -> Committed
    AutoSyncedPreset(PresetId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub order: RouteOrder,
    pub transition: SessionTransition,
}

#[derive(Debug, Clone)]
pub struct OrderingSession {
    route_id: RouteId,
    live: RankTable,
    committed: RankTable,
    custom_order: Option<Vec<LocationId>>,
    mode: SessionMode,
}

impl OrderingSession {
    pub fn new(route_id: RouteId) -> Self {
        Self {
            route_id,
            live: RankTable::new(),
            committed: RankTable::new(),
            custom_order: None,
            mode: SessionMode::Ranking,
        }
    }

    /// Reanuda la sesión a partir del orden persistido, si existe
    pub fn resume(route_id: RouteId, order: Option<RouteOrder>) -> Self {
        let mut session = Self::new(route_id);
        if let Some(order) = order {
            session.live = order.ranks.clone();
            session.committed = order.ranks;
            session.custom_order = Some(order.location_ids);
        }
        session
    }

    pub fn route_id(&self) -> RouteId {
        self.route_id
    }

    pub fn ranks(&self) -> &RankTable {
        &self.live
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn distance_mode(&self) -> DistanceMode {
        DistanceMode::for_ranks(&self.live)
    }

    pub fn custom_order(&self) -> Option<&[LocationId]> {
        self.custom_order.as_deref()
    }

    pub fn has_custom_order(&self) -> bool {
        self.custom_order.is_some()
    }

    /// Preset en edición, si lo hay
    pub fn editing_preset(&self) -> Option<PresetId> {
        match self.mode {
            SessionMode::EditingPreset(id) => Some(id),
            _ => None,
        }
    }

    /// Orden mostrado de las ubicaciones de la ruta
    pub fn displayed<'a>(&self, locations: &'a [Location]) -> Vec<&'a Location> {
        displayed_order(locations, self.custom_order())
    }

    pub fn set_rank(
        &mut self,
        location_id: LocationId,
        raw: &str,
        locations: &[Location],
    ) -> Result<RankUpdate, OrderingError> {
        if !locations.iter().any(|location| location.id == location_id) {
            return Err(OrderingError::UnknownLocation(location_id));
        }
        let update = self.live.set_rank(location_id, raw);
        debug!("✏️ Rango de {} en ruta {}: {:?}", location_id, self.route_id, update);
        Ok(update)
    }

    /// Confirma la tabla en edición como nuevo orden de la ruta.
    ///
    /// Falla sin tocar nada si no hay rangos o si hay rangos repetidos.
    pub fn commit(&mut self, locations: &[Location]) -> Result<CommitOutcome, OrderingError> {
        if !self.live.has_any_rank() {
            return Err(OrderingError::NoRanksSet);
        }

        let shown: Vec<Location> = self.displayed(locations).into_iter().cloned().collect();
        let location_ids = resolve(&shown, &self.live)?;

        let transition = match self.mode {
            SessionMode::Preview(preset_id) => SessionTransition::AutoSyncedPreset(preset_id),
            SessionMode::Ranking | SessionMode::EditingPreset(_) => SessionTransition::Committed,
        };

        self.committed = self.live.clone();
        self.custom_order = Some(location_ids.clone());
        if !matches!(self.mode, SessionMode::EditingPreset(_)) {
            self.mode = SessionMode::Ranking;
        }

        info!(
            "✅ Orden aplicado en ruta {} ({} ubicaciones, {:?})",
            self.route_id,
            location_ids.len(),
            transition
        );

        Ok(CommitOutcome {
            order: RouteOrder::new(self.route_id, location_ids, self.committed.clone()),
            transition,
        })
    }

    /// Descarta la edición en curso y vuelve a la última tabla confirmada
    pub fn cancel(&mut self) {
        self.live = self.committed.clone();
        self.mode = SessionMode::Ranking;
    }

    /// Vuelve al orden por defecto
    pub fn reset_order(&mut self) {
        self.live.clear();
        self.committed.clear();
        self.custom_order = None;
        self.mode = SessionMode::Ranking;
    }

    /// Carga el snapshot del preset sin confirmarlo
    pub fn apply_preview(&mut self, preset: &SortPreset) -> Result<(), OrderingError> {
        ensure_route(preset, self.route_id)?;
        self.live = preset.ranks.clone();
        self.mode = SessionMode::Preview(preset.id);
        info!("👀 Preview del preset '{}' en ruta {}", preset.name, self.route_id);
        Ok(())
    }

    /// Carga el snapshot del preset para editarlo; no borra el original
    pub fn begin_edit(&mut self, preset: &SortPreset) -> Result<(), OrderingError> {
        ensure_route(preset, self.route_id)?;
        self.live = preset.ranks.clone();
        self.mode = SessionMode::EditingPreset(preset.id);
        Ok(())
    }

    /// El preset en edición quedó guardado
    pub fn finish_edit(&mut self) {
        if matches!(self.mode, SessionMode::EditingPreset(_)) {
            self.mode = SessionMode::Ranking;
        }
    }

    /// Sale de preview/edición si el preset borrado era el activo
    pub fn preset_deleted(&mut self, preset_id: PresetId) -> bool {
        match self.mode {
            SessionMode::Preview(id) | SessionMode::EditingPreset(id) if id == preset_id => {
                self.mode = SessionMode::Ranking;
                true
            }
            _ => false,
        }
    }

    /// Olvida rangos y posiciones de ubicaciones que ya no existen
    pub fn retain_locations(&mut self, existing: &HashSet<LocationId>) {
        self.live.retain_locations(existing);
        self.committed.retain_locations(existing);
        if let Some(order) = self.custom_order.as_mut() {
            order.retain(|id| existing.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;
    use crate::services::preset_store::new_preset;
    use crate::services::rank_table::Rank;

    fn fixture() -> (Route, Vec<Location>) {
        let route = Route::new("KL 7", "PM", "3AVK04");
        let locations = vec![
            Location::new(route.id, "34", "Wisma Cimb").with_coordinates(3.1390, 101.6869),
            Location::new(route.id, "42", "Plaza Rakyat").with_coordinates(3.1500, 101.7000),
            Location::new(route.id, "51", "KLCC Tower").with_coordinates(3.1579, 101.7116),
        ];
        (route, locations)
    }

    fn codes<'a>(session: &OrderingSession, locations: &'a [Location]) -> Vec<&'a str> {
        session
            .displayed(locations)
            .into_iter()
            .map(|location| location.code.as_str())
            .collect()
    }

    #[test]
    fn test_commit_requires_a_rank() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        assert_eq!(session.commit(&locations), Err(OrderingError::NoRanksSet));
        assert!(!session.has_custom_order());
    }

    #[test]
    fn test_commit_blocked_on_duplicates() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        session.set_rank(locations[0].id, "1", &locations).unwrap();
        session.set_rank(locations[1].id, "1", &locations).unwrap();

        let result = session.commit(&locations);
        assert!(matches!(result, Err(OrderingError::DuplicateRanks { .. })));
        assert!(session.custom_order().is_none());
        assert_eq!(codes(&session, &locations), vec!["34", "42", "51"]);
    }

    #[test]
    fn test_commit_applies_order_and_cancel_restores_it() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        session.set_rank(locations[2].id, "1", &locations).unwrap();

        let outcome = session.commit(&locations).unwrap();
        assert_eq!(outcome.transition, SessionTransition::Committed);
        assert_eq!(codes(&session, &locations), vec!["51", "34", "42"]);
        assert_eq!(session.distance_mode(), DistanceMode::Chained);

        session.set_rank(locations[1].id, "0", &locations).unwrap();
        session.cancel();
        assert_eq!(session.ranks(), &outcome.order.ranks);
        assert_eq!(codes(&session, &locations), vec!["51", "34", "42"]);
    }

    #[test]
    fn test_set_rank_on_foreign_location_is_rejected() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        let foreign = LocationId::new();
        assert_eq!(
            session.set_rank(foreign, "1", &locations),
            Err(OrderingError::UnknownLocation(foreign))
        );
    }

    #[test]
    fn test_ranking_switches_distance_mode_without_commit() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        assert_eq!(session.distance_mode(), DistanceMode::Direct);
        session.set_rank(locations[0].id, "3", &locations).unwrap();
        assert_eq!(session.distance_mode(), DistanceMode::Chained);
        session.set_rank(locations[0].id, "", &locations).unwrap();
        assert_eq!(session.distance_mode(), DistanceMode::Direct);
    }

    #[test]
    fn test_preview_round_trip_and_auto_sync() {
        let (route, locations) = fixture();
        let snapshot: RankTable = [(locations[1].id, Rank(1)), (locations[0].id, Rank(2))]
            .into_iter()
            .collect();
        let preset = new_preset(&route, "Morning", &snapshot, false).unwrap();

        let mut session = OrderingSession::new(route.id);
        session.apply_preview(&preset).unwrap();
        assert_eq!(session.ranks(), &snapshot);
        assert_eq!(session.mode(), SessionMode::Preview(preset.id));
        assert!(!session.has_custom_order());

        session.set_rank(locations[2].id, "3", &locations).unwrap();
        let outcome = session.commit(&locations).unwrap();
        assert_eq!(outcome.transition, SessionTransition::AutoSyncedPreset(preset.id));
        assert_eq!(outcome.order.ranks.len(), 3);
        assert_eq!(session.mode(), SessionMode::Ranking);
        assert_eq!(codes(&session, &locations), vec!["42", "34", "51"]);
    }

    #[test]
    fn test_preview_of_other_route_does_not_mutate() {
        let (route, locations) = fixture();
        let other = Route::new("KL 8", "AM", "3AVK05");
        let snapshot: RankTable = [(LocationId::new(), Rank(1))].into_iter().collect();
        let preset = new_preset(&other, "Other", &snapshot, false).unwrap();

        let mut session = OrderingSession::new(route.id);
        session.set_rank(locations[0].id, "7", &locations).unwrap();
        let before = session.ranks().clone();

        assert!(matches!(
            session.apply_preview(&preset),
            Err(OrderingError::PresetRouteMismatch { .. })
        ));
        assert_eq!(session.ranks(), &before);
        assert_eq!(session.mode(), SessionMode::Ranking);
    }

    #[test]
    fn test_deleting_active_preview_exits_preview() {
        let (route, locations) = fixture();
        let snapshot: RankTable = [(locations[0].id, Rank(1))].into_iter().collect();
        let preset = new_preset(&route, "Morning", &snapshot, false).unwrap();

        let mut session = OrderingSession::new(route.id);
        session.apply_preview(&preset).unwrap();
        assert!(!session.preset_deleted(PresetId::new()));
        assert!(session.preset_deleted(preset.id));
        assert_eq!(session.mode(), SessionMode::Ranking);
    }

    #[test]
    fn test_edit_keeps_mode_until_saved() {
        let (route, locations) = fixture();
        let snapshot: RankTable = [(locations[0].id, Rank(1))].into_iter().collect();
        let preset = new_preset(&route, "Morning", &snapshot, false).unwrap();

        let mut session = OrderingSession::new(route.id);
        session.begin_edit(&preset).unwrap();
        assert_eq!(session.editing_preset(), Some(preset.id));

        session.commit(&locations).unwrap();
        assert_eq!(session.editing_preset(), Some(preset.id));

        session.finish_edit();
        assert_eq!(session.editing_preset(), None);

        session.begin_edit(&preset).unwrap();
        session.cancel();
        assert_eq!(session.mode(), SessionMode::Ranking);
    }

    #[test]
    fn test_resume_and_reset() {
        let (route, locations) = fixture();
        let ranks: RankTable = [(locations[2].id, Rank(1))].into_iter().collect();
        let order = RouteOrder::new(
            route.id,
            vec![locations[2].id, locations[0].id, locations[1].id],
            ranks.clone(),
        );

        let mut session = OrderingSession::resume(route.id, Some(order));
        assert_eq!(session.ranks(), &ranks);
        assert_eq!(codes(&session, &locations), vec!["51", "34", "42"]);

        session.reset_order();
        assert!(!session.has_custom_order());
        assert_eq!(session.distance_mode(), DistanceMode::Direct);
        assert_eq!(codes(&session, &locations), vec!["34", "42", "51"]);
    }

    #[test]
    fn test_retain_locations() {
        let (route, locations) = fixture();
        let mut session = OrderingSession::new(route.id);
        session.set_rank(locations[0].id, "1", &locations).unwrap();
        session.commit(&locations).unwrap();

        let remaining: HashSet<LocationId> = locations[1..].iter().map(|l| l.id).collect();
        session.retain_locations(&remaining);
        assert!(!session.ranks().has_any_rank());
        assert_eq!(session.custom_order().map(|o| o.len()), Some(2));
    }
}
