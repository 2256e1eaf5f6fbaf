//! Modelo del historial de cambios (audit trail)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChangelogId, RouteId};

/// Tipo de cambio registrado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    RouteCreated,
    RouteUpdated,
    RouteDeleted,
    LocationCreated,
    LocationUpdated,
    LocationDeleted,
    OrderApplied,
    OrderReset,
    PresetSaved,
    PresetReplaced,
    PresetVisibilityChanged,
    PresetDeleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub id: ChangelogId,
    pub route_id: Option<RouteId>,
    pub action: ChangeAction,
    pub detail: String,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
}

impl ChangelogEntry {
    pub fn new(route_id: Option<RouteId>, action: ChangeAction, detail: impl Into<String>) -> Self {
        Self {
            id: ChangelogId::new(),
            route_id,
            action,
            detail: detail.into(),
            created_at: Utc::now(),
            archived: false,
        }
    }
}
