use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Location, LocationId, RouteId};

// Request para crear una ubicación dentro de una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub power_mode: String,
    #[serde(default)]
    pub qr_code_image_url: String,
    #[serde(default)]
    pub qr_code_destination_url: String,
}

// Request para actualizar una ubicación; solo se aplican los campos presentes.
// Las coordenadas se reemplazan como par (ambas o ninguna).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub clear_coordinates: bool,
    pub address: Option<String>,
    pub description: Option<String>,
    pub delivery: Option<String>,
    pub power_mode: Option<String>,
    pub qr_code_image_url: Option<String>,
    pub qr_code_destination_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddImagesRequest {
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageRequest {
    pub image_url: String,
}

// Response de ubicación
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: LocationId,
    pub route_id: RouteId,
    pub code: String,
    /// Otro registro de la misma ruta usa este código
    pub duplicate_code: bool,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
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

impl LocationResponse {
    pub fn new(location: Location, duplicate_code: bool) -> Self {
        Self {
            id: location.id,
            route_id: location.route_id,
            code: location.code,
            duplicate_code,
            name: location.name,
            latitude: location.coordinates.map(|c| c.latitude),
            longitude: location.coordinates.map(|c| c.longitude),
            address: location.address,
            description: location.description,
            delivery: location.delivery,
            power_mode: location.power_mode,
            images: location.images,
            qr_code_image_url: location.qr_code_image_url,
            qr_code_destination_url: location.qr_code_destination_url,
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}
