//! Modelo de Location
//! 
//! Una ubicación es una parada de entrega que pertenece a exactamente una ruta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LocationId, RouteId};

/// Par latitud/longitud en grados
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Construye coordenadas solo si ambos valores están presentes
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }
}

/// Location principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub route_id: RouteId,
    /// Código corto, único dentro de la ruta (no se fuerza, solo se marca)
    pub code: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub address: String,
    pub description: String,
    pub delivery: String,
    pub power_mode: String,
    pub images: Vec<String>,
    pub qr_code_image_url: String,
    pub qr_code_destination_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn new(route_id: RouteId, code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: LocationId::new(),
            route_id,
            code: code.into(),
            name: name.into(),
            coordinates: None,
            address: String::new(),
            description: String::new(),
            delivery: String::new(),
            power_mode: String::new(),
            images: Vec::new(),
            qr_code_image_url: String::new(),
            qr_code_destination_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }

    /// Código interpretado como entero: dígitos iniciales, o 0 si no hay
    pub fn numeric_code(&self) -> u64 {
        numeric_code(&self.code)
    }

    /// Agrega imágenes sin duplicar las existentes
    pub fn add_images(&mut self, urls: impl IntoIterator<Item = String>) {
        for url in urls {
            if !self.images.contains(&url) {
                self.images.push(url);
            }
        }
        self.updated_at = Utc::now();
    }

    pub fn remove_image(&mut self, url: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img != url);
        let removed = self.images.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}

/// Interpreta un código como entero tomando los dígitos iniciales.
/// "34" -> 34, "12B" -> 12, "QL01" -> 0, "" -> 0.
/// Los valores que no caben en `u64` saturan para quedar al final.
pub fn numeric_code(code: &str) -> u64 {
    let digits: String = code
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_code() {
        assert_eq!(numeric_code("34"), 34);
        assert_eq!(numeric_code(" 7 "), 7);
        assert_eq!(numeric_code("12B"), 12);
        assert_eq!(numeric_code("QL01"), 0);
        assert_eq!(numeric_code(""), 0);
    }

    #[test]
    fn test_numeric_code_saturates_on_overflow() {
        assert_eq!(numeric_code("99999999999999999999999"), u64::MAX);
        assert_eq!(numeric_code("000000000000000000000007"), 7);
        assert!(numeric_code("123456789012345678901234") > numeric_code("51"));
    }

    #[test]
    fn test_images_are_deduplicated() {
        let mut location = Location::new(RouteId::new(), "34", "Wisma Cimb");
        location.add_images(vec!["a.png".to_string(), "b.png".to_string()]);
        location.add_images(vec!["a.png".to_string()]);
        assert_eq!(location.images, vec!["a.png", "b.png"]);

        assert!(location.remove_image("a.png"));
        assert!(!location.remove_image("a.png"));
        assert_eq!(location.images, vec!["b.png"]);
    }
}
