use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, LocationId, RouteId, SortPreset};
use crate::services::distance_annotator::DistanceMode;
use crate::services::ordering_session::{SessionMode, SessionTransition};
use crate::services::rank_table::{Rank, RankTable, RankUpdate};

// Request para fijar o limpiar el rango de una ubicación
#[derive(Debug, Deserialize)]
pub struct SetRankRequest {
    /// Entrada cruda: "" limpia, dígitos fijan, otra cosa se ignora
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankUpdateKind {
    Set,
    Cleared,
    Rejected,
}

impl From<RankUpdate> for RankUpdateKind {
    fn from(update: RankUpdate) -> Self {
        match update {
            RankUpdate::Set(_) => RankUpdateKind::Set,
            RankUpdate::Cleared => RankUpdateKind::Cleared,
            RankUpdate::Rejected => RankUpdateKind::Rejected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SetRankResponse {
    pub location_id: LocationId,
    pub update: RankUpdateKind,
    /// Valor vigente tras la operación
    pub rank: Option<Rank>,
    pub duplicate_rank: bool,
    pub can_apply: bool,
    pub ranks: RankTable,
}

#[derive(Debug, Serialize)]
pub struct OriginResponse {
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl OriginResponse {
    pub fn new(code: &str, coordinates: Coordinates) -> Self {
        Self {
            code: code.to_string(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }
}

// Fila del orden mostrado
#[derive(Debug, Serialize)]
pub struct OrderedLocation {
    pub position: usize,
    pub location_id: LocationId,
    pub code: String,
    pub name: String,
    pub rank: Option<Rank>,
    pub duplicate_rank: bool,
    pub cumulative_distance_km: Option<f64>,
    pub segment_distance_km: f64,
}

#[derive(Debug, Serialize)]
pub struct OrderingResponse {
    pub route_id: RouteId,
    pub session: SessionMode,
    pub distance_mode: DistanceMode,
    pub has_custom_order: bool,
    pub can_apply: bool,
    pub origin: OriginResponse,
    pub locations: Vec<OrderedLocation>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub order: Vec<LocationId>,
    pub transition: SessionTransition,
    /// `false` si el orden quedó aplicado localmente pero no se pudo guardar
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_preset: Option<SortPreset>,
}
