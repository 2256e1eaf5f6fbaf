//! Modelo de Route
//! 
//! Este módulo contiene el struct Route y su orden personalizado persistido.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::{LocationId, RouteId};
use crate::services::rank_table::RankTable;

/// Route principal - colección nombrada de ubicaciones por turno y almacén
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub shift: String,
    pub warehouse: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    pub fn new(name: impl Into<String>, shift: impl Into<String>, warehouse: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RouteId::new(),
            name: name.into(),
            shift: shift.into(),
            warehouse: warehouse.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Orden personalizado aplicado a una ruta.
/// Su sola existencia equivale al flag "has custom order".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOrder {
    pub route_id: RouteId,
    pub location_ids: Vec<LocationId>,
    /// Tabla de rangos con la que se resolvió este orden
    pub ranks: RankTable,
    pub applied_at: DateTime<Utc>,
}

impl RouteOrder {
    pub fn new(route_id: RouteId, location_ids: Vec<LocationId>, ranks: RankTable) -> Self {
        Self {
            route_id,
            location_ids,
            ranks,
            applied_at: Utc::now(),
        }
    }

    /// Quita posiciones y rangos de ubicaciones borradas.
    /// Devuelve `true` si algo cambió.
    pub fn retain_locations(&mut self, existing: &HashSet<LocationId>) -> bool {
        let before = (self.location_ids.len(), self.ranks.len());
        self.location_ids.retain(|id| existing.contains(id));
        self.ranks.retain_locations(existing);
        before != (self.location_ids.len(), self.ranks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rank_table::Rank;

    #[test]
    fn test_order_retain_locations() {
        let (a, b, c) = (LocationId::new(), LocationId::new(), LocationId::new());
        let ranks: RankTable = [(a, Rank(1))].into_iter().collect();
        let mut order = RouteOrder::new(RouteId::new(), vec![a, b, c], ranks);
        let applied_at = order.applied_at;

        assert!(!order.retain_locations(&HashSet::from([a, b, c])));
        assert!(order.retain_locations(&HashSet::from([b, c])));
        assert_eq!(order.location_ids, vec![b, c]);
        assert!(!order.ranks.has_any_rank());
        assert_eq!(order.applied_at, applied_at);
    }
}
