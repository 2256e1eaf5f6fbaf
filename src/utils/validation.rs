//! Utilidades de validación
//! 
//! Este módulo contiene funciones helper para validación de datos
//! de rutas y ubicaciones.

use validator::ValidationError;

use crate::models::Coordinates;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar latitud en grados
pub fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    validate_degrees("latitude", value, 90.0)
}

/// Validar longitud en grados
pub fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    validate_degrees("longitude", value, 180.0)
}

fn validate_degrees(code: &'static str, value: f64, limit: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < -limit || value > limit {
        let mut error = ValidationError::new(code);
        error.add_param("min".into(), &-limit);
        error.add_param("max".into(), &limit);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar un par de coordenadas opcional: ambas o ninguna
pub fn validate_coordinate_pair(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinates>, ValidationError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            validate_latitude(lat)?;
            validate_longitude(lng)?;
            Ok(Some(Coordinates::new(lat, lng)))
        }
        _ => Err(ValidationError::new("coordinates_pair")),
    }
}
