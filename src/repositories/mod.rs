//! Repositorios de persistencia
//! 
//! La persistencia es un colaborador externo: estos traits son la costura
//! entre el motor de orden y el backend concreto.

pub mod memory_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    ChangelogEntry, Location, LocationId, PresetId, Route, RouteId, RouteOrder, SortPreset,
};
use crate::utils::errors::StorageError;

pub use memory_repository::MemoryRepository;

pub type RepoResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn list_routes(&self) -> RepoResult<Vec<Route>>;
    async fn get_route(&self, id: RouteId) -> RepoResult<Option<Route>>;
    /// Inserta o reemplaza por id
    async fn save_route(&self, route: Route) -> RepoResult<Route>;
    /// Borra la ruta junto con sus ubicaciones, su orden y sus presets
    async fn delete_route(&self, id: RouteId) -> RepoResult<bool>;

    async fn list_locations(&self, route_id: RouteId) -> RepoResult<Vec<Location>>;
    async fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>>;
    async fn save_location(&self, location: Location) -> RepoResult<Location>;
    async fn delete_location(&self, id: LocationId) -> RepoResult<bool>;

    async fn get_order(&self, route_id: RouteId) -> RepoResult<Option<RouteOrder>>;
    async fn save_order(&self, order: RouteOrder) -> RepoResult<()>;
    async fn clear_order(&self, route_id: RouteId) -> RepoResult<()>;
}

#[async_trait]
pub trait PresetRepository: Send + Sync {
    /// Presets de la ruta en orden de almacenamiento
    async fn list_presets(&self, route_id: RouteId) -> RepoResult<Vec<SortPreset>>;
    async fn get_preset(&self, id: PresetId) -> RepoResult<Option<SortPreset>>;
    async fn insert_preset(&self, preset: SortPreset) -> RepoResult<()>;
    /// Reemplaza en su misma posición; `false` si no existe
    async fn update_preset(&self, preset: SortPreset) -> RepoResult<bool>;
    async fn delete_preset(&self, id: PresetId) -> RepoResult<Option<SortPreset>>;
}

#[async_trait]
pub trait ChangelogRepository: Send + Sync {
    async fn append_change(&self, entry: ChangelogEntry) -> RepoResult<()>;
    /// Más recientes primero
    async fn list_changes(
        &self,
        route_id: Option<RouteId>,
        include_archived: bool,
    ) -> RepoResult<Vec<ChangelogEntry>>;
    /// Marca como archivadas las entradas anteriores a `cutoff`
    async fn archive_changes_before(&self, cutoff: DateTime<Utc>) -> RepoResult<usize>;
}

/// Backend completo usado por el estado de la aplicación
pub trait Repository: RouteRepository + PresetRepository + ChangelogRepository {}

impl<T> Repository for T where T: RouteRepository + PresetRepository + ChangelogRepository {}
