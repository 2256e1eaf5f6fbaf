//! Cálculo de distancias geográficas
//! 
//! Distancia de gran círculo (haversine) entre dos coordenadas en grados.

use crate::models::Coordinates;

/// Radio medio de la Tierra en kilómetros
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distancia haversine en kilómetros.
///
/// Ambas coordenadas deben existir: las ubicaciones sin geocodificar se
/// omiten antes de llegar aquí, nunca se pasan con valores centinela.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
