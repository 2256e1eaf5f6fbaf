use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::dto::ApiResponse;
use crate::models::{ChangeAction, Route, RouteId};
use crate::repositories::RouteRepository;
use crate::services::changelog_service;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::validate_not_empty;

pub struct RouteController {
    state: AppState,
}

impl RouteController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn to_response(&self, route: Route) -> AppResult<RouteResponse> {
        let repository = &self.state.repository;
        let location_count = repository.list_locations(route.id).await?.len();
        let has_custom_order = repository.get_order(route.id).await?.is_some();
        Ok(RouteResponse::new(route, location_count, has_custom_order))
    }

    pub async fn list(&self) -> AppResult<Vec<RouteResponse>> {
        let routes = self.state.repository.list_routes().await?;
        let mut response = Vec::with_capacity(routes.len());
        for route in routes {
            response.push(self.to_response(route).await?);
        }
        Ok(response)
    }

    pub async fn get(&self, id: RouteId) -> AppResult<RouteResponse> {
        let route = self.find(id).await?;
        self.to_response(route).await
    }

    pub async fn find(&self, id: RouteId) -> AppResult<Route> {
        self.state
            .repository
            .get_route(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;
        if validate_not_empty(&request.name).is_err() {
            return Err(validation_error("name", "El nombre de la ruta es requerido"));
        }

        let mut route = Route::new(request.name.trim(), request.shift, request.warehouse);
        route.description = request.description;
        let route = self.state.repository.save_route(route).await?;

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route.id),
            ChangeAction::RouteCreated,
            format!("Ruta '{}' creada", route.name),
        )
        .await;
        info!("🛣️ Ruta '{}' creada", route.name);

        Ok(ApiResponse::success_with_message(
            RouteResponse::new(route, 0, false),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: RouteId,
        request: UpdateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;
        let mut route = self.find(id).await?;

        if let Some(name) = request.name {
            if validate_not_empty(&name).is_err() {
                return Err(validation_error("name", "El nombre de la ruta es requerido"));
            }
            route.name = name.trim().to_string();
        }
        if let Some(shift) = request.shift {
            route.shift = shift;
        }
        if let Some(warehouse) = request.warehouse {
            route.warehouse = warehouse;
        }
        if let Some(description) = request.description {
            route.description = description;
        }
        route.updated_at = Utc::now();

        let route = self.state.repository.save_route(route).await?;
        changelog_service::record(
            self.state.repository.as_ref(),
            Some(route.id),
            ChangeAction::RouteUpdated,
            format!("Ruta '{}' actualizada", route.name),
        )
        .await;

        let response = self.to_response(route).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Ruta actualizada exitosamente".to_string(),
        ))
    }

    /// Borra la ruta con sus ubicaciones, orden y presets, y cierra su sesión
    pub async fn delete(&self, id: RouteId) -> AppResult<()> {
        let route = self.find(id).await?;
        if !self.state.repository.delete_route(id).await? {
            return Err(not_found_error("Route", &id.to_string()));
        }
        self.state.close_session(id).await;

        changelog_service::record(
            self.state.repository.as_ref(),
            Some(id),
            ChangeAction::RouteDeleted,
            format!("Ruta '{}' eliminada", route.name),
        )
        .await;
        info!("🗑️ Ruta '{}' eliminada", route.name);
        Ok(())
    }
}
