//! Modelo de SortPreset
//! 
//! Snapshot nombrado de una tabla de rangos, asociado a una ruta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PresetId, RouteId};
use crate::services::rank_table::RankTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortPreset {
    pub id: PresetId,
    pub name: String,
    pub route_id: RouteId,
    pub route_name: String,
    pub ranks: RankTable,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
