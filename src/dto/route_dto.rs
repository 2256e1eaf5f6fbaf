use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Route, RouteId};

// Request para crear una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub shift: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub warehouse: String,
    #[serde(default)]
    pub description: String,
}

// Request para actualizar una ruta; solo se aplican los campos presentes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 20))]
    pub shift: Option<String>,
    #[validate(length(max = 50))]
    pub warehouse: Option<String>,
    pub description: Option<String>,
}

// Response de ruta
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: RouteId,
    pub name: String,
    pub shift: String,
    pub warehouse: String,
    pub description: String,
    pub location_count: usize,
    pub has_custom_order: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteResponse {
    pub fn new(route: Route, location_count: usize, has_custom_order: bool) -> Self {
        Self {
            id: route.id,
            name: route.name,
            shift: route.shift,
            warehouse: route.warehouse,
            description: route.description,
            location_count,
            has_custom_order,
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}
