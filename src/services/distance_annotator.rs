//! Anotación de distancias sobre el orden mostrado
//! 
//! En modo directo cada ubicación se mide desde el origen. En modo
//! encadenado se recorre la lista en orden acumulando tramos.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Location, LocationId};
use crate::services::geo::distance_km;
use crate::services::rank_table::RankTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    Direct,
    Chained,
}

impl DistanceMode {
    /// Se recalcula en cada render: encadenado si hay algún rango fijado
    pub fn for_ranks(ranks: &RankTable) -> Self {
        if ranks.has_any_rank() {
            DistanceMode::Chained
        } else {
            DistanceMode::Direct
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceAnnotation {
    pub location_id: LocationId,
    /// `None` cuando la ubicación no tiene coordenadas
    pub cumulative_distance_km: Option<f64>,
    pub segment_distance_km: f64,
}

impl DistanceAnnotation {
    fn missing(location_id: LocationId) -> Self {
        Self {
            location_id,
            cumulative_distance_km: None,
            segment_distance_km: 0.0,
        }
    }
}

pub fn annotate(ordered: &[&Location], origin: Coordinates, mode: DistanceMode) -> Vec<DistanceAnnotation> {
    match mode {
        DistanceMode::Direct => annotate_direct(ordered, origin),
        DistanceMode::Chained => annotate_chained(ordered, origin),
    }
}

fn annotate_direct(ordered: &[&Location], origin: Coordinates) -> Vec<DistanceAnnotation> {
    ordered
        .iter()
        .map(|location| match location.coordinates {
            Some(point) => {
                let distance = distance_km(origin, point);
                DistanceAnnotation {
                    location_id: location.id,
                    cumulative_distance_km: Some(distance),
                    segment_distance_km: distance,
                }
            }
            None => DistanceAnnotation::missing(location.id),
        })
        .collect()
}

fn annotate_chained(ordered: &[&Location], origin: Coordinates) -> Vec<DistanceAnnotation> {
    let mut previous = origin;
    let mut total = 0.0;

    ordered
        .iter()
        .map(|location| match location.coordinates {
            Some(point) => {
                let segment = distance_km(previous, point);
                total += segment;
                previous = point;
                DistanceAnnotation {
                    location_id: location.id,
                    cumulative_distance_km: Some(total),
                    segment_distance_km: segment,
                }
            }
            // Tramo de longitud cero, `previous` no avanza
            None => DistanceAnnotation::missing(location.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteId;
    use crate::services::rank_table::Rank;

    const EPS: f64 = 1e-9;

    fn origin() -> Coordinates {
        Coordinates::new(3.0695500, 101.5469179)
    }

    fn fixture() -> Vec<Location> {
        let route_id = RouteId::new();
        vec![
            Location::new(route_id, "1", "A").with_coordinates(3.1390, 101.6869),
            Location::new(route_id, "2", "B").with_coordinates(3.1500, 101.7000),
            Location::new(route_id, "3", "C").with_coordinates(3.1579, 101.7116),
        ]
    }

    #[test]
    fn test_mode_follows_rank_table() {
        let mut ranks = RankTable::new();
        assert_eq!(DistanceMode::for_ranks(&ranks), DistanceMode::Direct);
        ranks.set(LocationId::new(), Some(Rank(1)));
        assert_eq!(DistanceMode::for_ranks(&ranks), DistanceMode::Chained);
    }

    #[test]
    fn test_direct_mode_measures_from_origin() {
        let locs = fixture();
        let ordered: Vec<&Location> = locs.iter().collect();
        let annotations = annotate(&ordered, origin(), DistanceMode::Direct);

        for (location, annotation) in locs.iter().zip(&annotations) {
            let expected = distance_km(origin(), location.coordinates.unwrap());
            assert!((annotation.segment_distance_km - expected).abs() < EPS);
            assert_eq!(annotation.cumulative_distance_km, Some(annotation.segment_distance_km));
        }
    }

    #[test]
    fn test_chained_mode_accumulates_segments() {
        let locs = fixture();
        let ordered: Vec<&Location> = locs.iter().collect();
        let annotations = annotate(&ordered, origin(), DistanceMode::Chained);

        let [a, b, c] = [0, 1, 2].map(|i| locs[i].coordinates.unwrap());
        let seg_a = distance_km(origin(), a);
        let seg_b = distance_km(a, b);
        let seg_c = distance_km(b, c);

        assert!((annotations[0].segment_distance_km - seg_a).abs() < EPS);
        assert!((annotations[1].segment_distance_km - seg_b).abs() < EPS);
        assert!((annotations[1].segment_distance_km - 1.9004).abs() < 0.001);
        assert!((annotations[2].segment_distance_km - seg_c).abs() < EPS);

        let cumulative_b = annotations[1].cumulative_distance_km.unwrap();
        assert!((cumulative_b - (annotations[0].cumulative_distance_km.unwrap() + seg_b)).abs() < EPS);
        let cumulative_c = annotations[2].cumulative_distance_km.unwrap();
        assert!((cumulative_c - (seg_a + seg_b + seg_c)).abs() < EPS);
    }

    #[test]
    fn test_missing_coordinates_do_not_advance_the_walk() {
        let route_id = RouteId::new();
        let a = Location::new(route_id, "1", "A").with_coordinates(3.1390, 101.6869);
        let gap = Location::new(route_id, "2", "Sin geocodificar");
        let c = Location::new(route_id, "3", "C").with_coordinates(3.1500, 101.7000);
        let ordered = vec![&a, &gap, &c];

        let annotations = annotate(&ordered, origin(), DistanceMode::Chained);
        assert_eq!(annotations[1].cumulative_distance_km, None);
        assert_eq!(annotations[1].segment_distance_km, 0.0);

        let expected_c = distance_km(a.coordinates.unwrap(), c.coordinates.unwrap());
        assert!((annotations[2].segment_distance_km - expected_c).abs() < EPS);

        let direct = annotate(&ordered, origin(), DistanceMode::Direct);
        assert_eq!(direct[1].cumulative_distance_km, None);
        assert_eq!(direct[1].segment_distance_km, 0.0);
    }
}
