//! Resolución del orden personalizado
//! 
//! Pipeline en dos fases: `partition` separa ubicaciones con y sin rango,
//! cada partición se ordena por separado y el resultado es
//! `ranked ++ unranked`.

use std::collections::HashSet;

use crate::models::{Location, LocationId};
use crate::services::rank_table::{Rank, RankTable};
use crate::utils::errors::OrderingError;

/// Ubicación con rango y su posición en la lista de entrada
#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    pub rank: Rank,
    pub index: usize,
    pub location: &'a Location,
}

/// Resultado de la primera fase
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub ranked: Vec<RankedEntry<'a>>,
    pub unranked: Vec<&'a Location>,
}

pub fn partition<'a>(locations: &'a [Location], ranks: &RankTable) -> Partition<'a> {
    let mut result = Partition::default();
    for (index, location) in locations.iter().enumerate() {
        match ranks.get(&location.id) {
            Some(rank) => result.ranked.push(RankedEntry { rank, index, location }),
            None => result.unranked.push(location),
        }
    }
    result
}

/// Ascendente por rango; rangos iguales conservan el orden de entrada
pub fn order_ranked<'a>(mut ranked: Vec<RankedEntry<'a>>) -> Vec<&'a Location> {
    ranked.sort_by_key(|entry| (entry.rank, entry.index));
    ranked.into_iter().map(|entry| entry.location).collect()
}

/// Ascendente por código numérico (no numérico = 0), estable
pub fn order_unranked(mut unranked: Vec<&Location>) -> Vec<&Location> {
    unranked.sort_by_key(|location| location.numeric_code());
    unranked
}

/// Primer rango repetido entre las ubicaciones con rango
pub fn find_duplicate(ranked: &[RankedEntry<'_>]) -> Option<OrderingError> {
    let mut sorted: Vec<&RankedEntry<'_>> = ranked.iter().collect();
    sorted.sort_by_key(|entry| (entry.rank, entry.index));

    sorted.windows(2).find(|pair| pair[0].rank == pair[1].rank).map(|pair| {
        let rank = pair[0].rank;
        OrderingError::DuplicateRanks {
            rank,
            location_ids: sorted
                .iter()
                .filter(|entry| entry.rank == rank)
                .map(|entry| entry.location.id)
                .collect(),
        }
    })
}

/// Resuelve el nuevo orden. Con la tabla vacía equivale al orden por defecto.
pub fn resolve(locations: &[Location], ranks: &RankTable) -> Result<Vec<LocationId>, OrderingError> {
    let Partition { ranked, unranked } = partition(locations, ranks);

    if let Some(duplicate) = find_duplicate(&ranked) {
        return Err(duplicate);
    }

    Ok(order_ranked(ranked)
        .into_iter()
        .chain(order_unranked(unranked))
        .map(|location| location.id)
        .collect())
}

/// Orden por defecto: toda la lista por código numérico
pub fn default_order(locations: &[Location]) -> Vec<LocationId> {
    order_unranked(locations.iter().collect())
        .into_iter()
        .map(|location| location.id)
        .collect()
}

/// Orden mostrado de una ruta.
///
/// Sin orden personalizado se usa el orden por defecto. Con orden
/// personalizado, los ids que ya no existen se descartan y las ubicaciones
/// que no figuran en él se agregan al final en orden por defecto.
pub fn displayed_order<'a>(locations: &'a [Location], custom: Option<&[LocationId]>) -> Vec<&'a Location> {
    let Some(custom) = custom else {
        return order_unranked(locations.iter().collect());
    };

    let mut placed: HashSet<LocationId> = HashSet::with_capacity(custom.len());
    let mut ordered: Vec<&Location> = Vec::with_capacity(locations.len());

    for id in custom {
        if placed.contains(id) {
            continue;
        }
        if let Some(location) = locations.iter().find(|location| location.id == *id) {
            placed.insert(*id);
            ordered.push(location);
        }
    }

    let rest: Vec<&Location> = locations
        .iter()
        .filter(|location| !placed.contains(&location.id))
        .collect();
    ordered.extend(order_unranked(rest));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteId;

    fn locations(codes: &[&str]) -> Vec<Location> {
        let route_id = RouteId::new();
        codes
            .iter()
            .map(|code| Location::new(route_id, *code, format!("Stop {code}")))
            .collect()
    }

    fn codes(locations: &[Location], order: &[LocationId]) -> Vec<String> {
        order
            .iter()
            .map(|id| {
                locations
                    .iter()
                    .find(|location| location.id == *id)
                    .map(|location| location.code.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_ranked_then_unranked_by_code() {
        let locs = locations(&["51", "34", "42", "QL01", "7"]);
        let mut ranks = RankTable::new();
        ranks.set(locs[2].id, Some(Rank(1)));
        ranks.set(locs[0].id, Some(Rank(5)));

        let order = resolve(&locs, &ranks).unwrap();
        assert_eq!(codes(&locs, &order), vec!["42", "51", "QL01", "7", "34"]);
    }

    #[test]
    fn test_resolution_is_a_permutation() {
        let locs = locations(&["9", "3", "12", "3", "", "x"]);
        let mut ranks = RankTable::new();
        ranks.set(locs[5].id, Some(Rank(2)));
        ranks.set(locs[1].id, Some(Rank(0)));

        let order = resolve(&locs, &ranks).unwrap();
        assert_eq!(order.len(), locs.len());
        let input: HashSet<LocationId> = locs.iter().map(|l| l.id).collect();
        let output: HashSet<LocationId> = order.iter().copied().collect();
        assert_eq!(input, output);
    }

    #[test]
    fn test_every_ranked_precedes_every_unranked() {
        let locs = locations(&["1", "2", "3", "4", "5", "6"]);
        let mut ranks = RankTable::new();
        ranks.set(locs[5].id, Some(Rank(10)));
        ranks.set(locs[3].id, Some(Rank(20)));

        let order = resolve(&locs, &ranks).unwrap();
        let last_ranked = order
            .iter()
            .rposition(|id| ranks.get(id).is_some())
            .unwrap();
        let first_unranked = order.iter().position(|id| ranks.get(id).is_none()).unwrap();
        assert!(last_ranked < first_unranked);
    }

    #[test]
    fn test_default_mode_is_idempotent() {
        let locs = locations(&["51", "34", "42"]);
        let empty = RankTable::new();

        let first = resolve(&locs, &empty).unwrap();
        let reordered: Vec<Location> = first
            .iter()
            .filter_map(|id| locs.iter().find(|l| l.id == *id).cloned())
            .collect();
        let second = resolve(&reordered, &empty).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, default_order(&locs));
    }

    #[test]
    fn test_duplicate_ranks_are_rejected() {
        let locs = locations(&["1", "2", "3"]);
        let mut ranks = RankTable::new();
        ranks.set(locs[0].id, Some(Rank(1)));
        ranks.set(locs[1].id, Some(Rank(1)));

        match resolve(&locs, &ranks) {
            Err(OrderingError::DuplicateRanks { rank, location_ids }) => {
                assert_eq!(rank, Rank(1));
                assert_eq!(location_ids, vec![locs[0].id, locs[1].id]);
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_order_ranked_tie_break_is_input_order() {
        let locs = locations(&["1", "2", "3"]);
        let mut ranks = RankTable::new();
        ranks.set(locs[2].id, Some(Rank(1)));
        ranks.set(locs[0].id, Some(Rank(1)));

        let Partition { ranked, .. } = partition(&locs, &ranks);
        let ordered = order_ranked(ranked);
        assert_eq!(ordered[0].id, locs[0].id);
        assert_eq!(ordered[1].id, locs[2].id);
    }

    #[test]
    fn test_ranks_of_other_routes_are_ignored() {
        let locs = locations(&["2", "1"]);
        let mut ranks = RankTable::new();
        ranks.set(LocationId::new(), Some(Rank(1)));
        ranks.set(locs[0].id, Some(Rank(1)));

        let order = resolve(&locs, &ranks).unwrap();
        assert_eq!(codes(&locs, &order), vec!["2", "1"]);
    }

    #[test]
    fn test_displayed_order_appends_new_and_drops_deleted() {
        let locs = locations(&["30", "10", "20"]);
        let custom = vec![locs[2].id, LocationId::new(), locs[0].id];

        let shown: Vec<&str> = displayed_order(&locs, Some(&custom))
            .iter()
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(shown, vec!["20", "30", "10"]);

        let default: Vec<&str> = displayed_order(&locs, None)
            .iter()
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(default, vec!["10", "20", "30"]);
    }
}
