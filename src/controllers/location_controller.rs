use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::dto::location_dto::{
    AddImagesRequest, CreateLocationRequest, LocationResponse, RemoveImageRequest,
    UpdateLocationRequest,
};
use crate::dto::ApiResponse;
use crate::models::{ChangeAction, Location, LocationId, RouteId};
use crate::repositories::RouteRepository;
use crate::services::changelog_service;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::validate_coordinate_pair;

pub struct LocationController {
    state: AppState,
}

/// Códigos repetidos dentro de una misma ruta (se marcan, no se rechazan)
fn duplicate_codes(locations: &[Location]) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for location in locations {
        *counts.entry(location.code.trim()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(code, _)| code.to_string())
        .collect()
}

fn coordinates_error(error: validator::ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add("coordinates", error);
    AppError::Validation(errors)
}

impl LocationController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn find(&self, id: LocationId) -> AppResult<Location> {
        self.state
            .repository
            .get_location(id)
            .await?
            .ok_or_else(|| not_found_error("Location", &id.to_string()))
    }

    async fn to_response(&self, location: Location) -> AppResult<LocationResponse> {
        let siblings = self.state.repository.list_locations(location.route_id).await?;
        let duplicate = duplicate_codes(&siblings).contains(location.code.trim());
        Ok(LocationResponse::new(location, duplicate))
    }

    /// Ubicaciones de la ruta en el orden mostrado
    pub async fn list_by_route(&self, route_id: RouteId) -> AppResult<Vec<LocationResponse>> {
        let session = self.state.session(route_id).await?;
        let locations = self.state.repository.list_locations(route_id).await?;
        let duplicates = duplicate_codes(&locations);

        Ok(session
            .displayed(&locations)
            .into_iter()
            .map(|location| {
                let duplicate = duplicates.contains(location.code.trim());
                LocationResponse::new(location.clone(), duplicate)
            })
            .collect())
    }

    pub async fn create(
        &self,
        route_id: RouteId,
        request: CreateLocationRequest,
    ) -> AppResult<ApiResponse<LocationResponse>> {
        request.validate()?;
        if self.state.repository.get_route(route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id.to_string()));
        }
        let code = request.code.trim();
        if code.is_empty() {
            return Err(bad_request_error("El código de la ubicación es requerido"));
        }

        let mut location = Location::new(route_id, code, request.name);
        location.coordinates =
            validate_coordinate_pair(request.latitude, request.longitude).map_err(coordinates_error)?;
        location.address = request.address;
        location.description = request.description;
        location.delivery = request.delivery;
        location.power_mode = request.power_mode;
        location.qr_code_image_url = request.qr_code_image_url;
        location.qr_code_destination_url = request.qr_code_destination_url;

        let location = self.state.repository.save_location(location).await?;
        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route_id),
            ChangeAction::LocationCreated,
            format!("Ubicación {} '{}' creada", location.code, location.name),
        )
        .await;
        info!("📍 Ubicación {} creada en ruta {}", location.code, route_id);

        let response = self.to_response(location).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Ubicación guardada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: LocationId,
        request: UpdateLocationRequest,
    ) -> AppResult<ApiResponse<LocationResponse>> {
        request.validate()?;
        let mut location = self.find(id).await?;

        if let Some(code) = request.code {
            let code = code.trim();
            if code.is_empty() {
                return Err(bad_request_error("El código de la ubicación es requerido"));
            }
            location.code = code.to_string();
        }
        if let Some(name) = request.name {
            location.name = name;
        }
        if request.clear_coordinates {
            location.coordinates = None;
        } else if request.latitude.is_some() || request.longitude.is_some() {
            location.coordinates = validate_coordinate_pair(request.latitude, request.longitude)
                .map_err(coordinates_error)?;
        }
        if let Some(address) = request.address {
            location.address = address;
        }
        if let Some(description) = request.description {
            location.description = description;
        }
        if let Some(delivery) = request.delivery {
            location.delivery = delivery;
        }
        if let Some(power_mode) = request.power_mode {
            location.power_mode = power_mode;
        }
        if let Some(url) = request.qr_code_image_url {
            location.qr_code_image_url = url;
        }
        if let Some(url) = request.qr_code_destination_url {
            location.qr_code_destination_url = url;
        }
        location.updated_at = Utc::now();

        let location = self.state.repository.save_location(location).await?;
        changelog_service::record(
            self.state.repository.as_ref(),
            Some(location.route_id),
            ChangeAction::LocationUpdated,
            format!("Ubicación {} actualizada", location.code),
        )
        .await;

        let response = self.to_response(location).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Ubicación actualizada exitosamente".to_string(),
        ))
    }

    pub async fn add_images(
        &self,
        id: LocationId,
        request: AddImagesRequest,
    ) -> AppResult<LocationResponse> {
        let mut location = self.find(id).await?;
        location.add_images(
            request
                .images
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        );
        let location = self.state.repository.save_location(location).await?;
        self.to_response(location).await
    }

    pub async fn remove_image(
        &self,
        id: LocationId,
        request: RemoveImageRequest,
    ) -> AppResult<LocationResponse> {
        let mut location = self.find(id).await?;
        if !location.remove_image(&request.image_url) {
            return Err(AppError::NotFound("Image not found on location".to_string()));
        }
        let location = self.state.repository.save_location(location).await?;
        self.to_response(location).await
    }

    /// Borra la ubicación y la olvida en la sesión de su ruta
    pub async fn delete(&self, id: LocationId) -> AppResult<()> {
        let location = self.find(id).await?;
        let mut session = self.state.session(location.route_id).await?;

        if !self.state.repository.delete_location(id).await? {
            return Err(not_found_error("Location", &id.to_string()));
        }
        let remaining: HashSet<LocationId> = self
            .state
            .repository
            .list_locations(location.route_id)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();
        session.retain_locations(&remaining);

        // El orden guardado tampoco puede seguir apuntando a la ubicación borrada
        if let Some(mut order) = self.state.repository.get_order(location.route_id).await? {
            if order.retain_locations(&remaining) {
                if let Err(e) = self.state.repository.save_order(order).await {
                    warn!("⚠️ No se pudo actualizar el orden de la ruta {}: {}", location.route_id, e);
                }
            }
        }

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(location.route_id),
            ChangeAction::LocationDeleted,
            format!("Ubicación {} '{}' eliminada", location.code, location.name),
        )
        .await;
        Ok(())
    }
}
