//! Presets de orden
//! 
//! Snapshots nombrados de una tabla de rangos, por ruta. Las validaciones
//! son funciones puras; `PresetStore` las combina con el repositorio.

use chrono::Utc;
use tracing::info;

use crate::models::{PresetId, Route, RouteId, SortPreset};
use crate::repositories::PresetRepository;
use crate::services::rank_table::RankTable;
use crate::utils::errors::{AppResult, OrderingError};

/// Valida nombre y snapshot comunes a crear y reemplazar
fn validate_snapshot(name: &str, ranks: &RankTable) -> Result<String, OrderingError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OrderingError::EmptyPresetName);
    }
    if !ranks.has_any_rank() {
        return Err(OrderingError::EmptyPresetSnapshot);
    }
    Ok(name.to_string())
}

/// Construye un preset nuevo con id y fecha de creación propios
pub fn new_preset(
    route: &Route,
    name: &str,
    ranks: &RankTable,
    is_public: bool,
) -> Result<SortPreset, OrderingError> {
    let name = validate_snapshot(name, ranks)?;
    let now = Utc::now();
    Ok(SortPreset {
        id: PresetId::new(),
        name,
        route_id: route.id,
        route_name: route.name.clone(),
        ranks: ranks.clone(),
        is_public,
        created_at: now,
        updated_at: now,
    })
}

/// Versión editada de `original`: conserva id, ruta y fecha de creación
pub fn replaced_preset(
    original: &SortPreset,
    name: &str,
    ranks: &RankTable,
    is_public: bool,
) -> Result<SortPreset, OrderingError> {
    let name = validate_snapshot(name, ranks)?;
    Ok(SortPreset {
        name,
        ranks: ranks.clone(),
        is_public,
        updated_at: Utc::now(),
        ..original.clone()
    })
}

/// Un preset solo se aplica sobre la ruta abierta
pub fn ensure_route(preset: &SortPreset, open_route: RouteId) -> Result<(), OrderingError> {
    if preset.route_id != open_route {
        return Err(OrderingError::PresetRouteMismatch {
            preset_route: preset.route_id,
            open_route,
        });
    }
    Ok(())
}

pub struct PresetStore<'a, R: PresetRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: PresetRepository + ?Sized> PresetStore<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    pub async fn save(
        &self,
        route: &Route,
        name: &str,
        ranks: &RankTable,
        is_public: bool,
    ) -> AppResult<SortPreset> {
        let preset = new_preset(route, name, ranks, is_public)?;
        self.repository.insert_preset(preset.clone()).await?;
        info!("📌 Preset '{}' guardado para la ruta {}", preset.name, route.name);
        Ok(preset)
    }

    /// Reemplazo atómico del preset editado; el original existe hasta aquí
    pub async fn replace(
        &self,
        id: PresetId,
        name: &str,
        ranks: &RankTable,
        is_public: bool,
    ) -> AppResult<SortPreset> {
        let original = self.get(id).await?;
        let preset = replaced_preset(&original, name, ranks, is_public)?;
        if !self.repository.update_preset(preset.clone()).await? {
            return Err(OrderingError::PresetNotFound(id).into());
        }
        info!("📌 Preset '{}' reemplazado", preset.name);
        Ok(preset)
    }

    pub async fn list(&self, route_id: RouteId) -> AppResult<Vec<SortPreset>> {
        Ok(self.repository.list_presets(route_id).await?)
    }

    pub async fn get(&self, id: PresetId) -> AppResult<SortPreset> {
        self.repository
            .get_preset(id)
            .await?
            .ok_or_else(|| OrderingError::PresetNotFound(id).into())
    }

    pub async fn toggle_visibility(&self, id: PresetId) -> AppResult<SortPreset> {
        let mut preset = self.get(id).await?;
        preset.is_public = !preset.is_public;
        preset.updated_at = Utc::now();
        if !self.repository.update_preset(preset.clone()).await? {
            return Err(OrderingError::PresetNotFound(id).into());
        }
        Ok(preset)
    }

    /// Sobrescribe el snapshot con la tabla recién confirmada
    pub async fn sync_snapshot(&self, id: PresetId, ranks: &RankTable) -> AppResult<SortPreset> {
        let mut preset = self.get(id).await?;
        preset.ranks = ranks.clone();
        preset.updated_at = Utc::now();
        if !self.repository.update_preset(preset.clone()).await? {
            return Err(OrderingError::PresetNotFound(id).into());
        }
        info!("🔄 Preset '{}' sincronizado con el orden aplicado", preset.name);
        Ok(preset)
    }

    pub async fn delete(&self, id: PresetId) -> AppResult<SortPreset> {
        self.repository
            .delete_preset(id)
            .await?
            .ok_or_else(|| OrderingError::PresetNotFound(id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationId;
    use crate::repositories::MemoryRepository;
    use crate::services::rank_table::Rank;
    use crate::utils::errors::AppError;

    fn ranks() -> RankTable {
        [(LocationId::new(), Rank(2)), (LocationId::new(), Rank(1))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_new_preset_validation() {
        let route = Route::new("KL 7", "PM", "3AVK04");
        assert_eq!(
            new_preset(&route, "  ", &ranks(), false),
            Err(OrderingError::EmptyPresetName)
        );
        assert_eq!(
            new_preset(&route, "Morning", &RankTable::new(), false),
            Err(OrderingError::EmptyPresetSnapshot)
        );

        let preset = new_preset(&route, " Morning ", &ranks(), true).unwrap();
        assert_eq!(preset.name, "Morning");
        assert_eq!(preset.route_id, route.id);
        assert_eq!(preset.route_name, "KL 7");
        assert!(preset.is_public);
    }

    #[test]
    fn test_ensure_route() {
        let route = Route::new("KL 7", "PM", "3AVK04");
        let preset = new_preset(&route, "Morning", &ranks(), false).unwrap();
        assert!(ensure_route(&preset, route.id).is_ok());
        assert!(matches!(
            ensure_route(&preset, RouteId::new()),
            Err(OrderingError::PresetRouteMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_list_returns_same_snapshot() {
        let repo = MemoryRepository::new();
        let store = PresetStore::new(&repo);
        let route = Route::new("KL 7", "PM", "3AVK04");
        let other = Route::new("KL 8", "AM", "3AVK05");
        let snapshot = ranks();

        store.save(&route, "Morning", &snapshot, false).await.unwrap();
        store.save(&other, "Other", &ranks(), false).await.unwrap();
        store.save(&route, "Evening", &ranks(), true).await.unwrap();

        let listed = store.list(route.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Morning");
        assert_eq!(listed[0].ranks, snapshot);
        assert_eq!(listed[1].name, "Evening");
    }

    #[tokio::test]
    async fn test_empty_save_creates_nothing() {
        let repo = MemoryRepository::new();
        let store = PresetStore::new(&repo);
        let route = Route::new("KL 7", "PM", "3AVK04");

        let result = store.save(&route, "", &ranks(), false).await;
        assert!(matches!(result, Err(AppError::Ordering(OrderingError::EmptyPresetName))));
        assert!(store.list(route.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_replace_and_delete() {
        let repo = MemoryRepository::new();
        let store = PresetStore::new(&repo);
        let route = Route::new("KL 7", "PM", "3AVK04");
        let preset = store.save(&route, "Morning", &ranks(), false).await.unwrap();

        let toggled = store.toggle_visibility(preset.id).await.unwrap();
        assert!(toggled.is_public);

        let edited = ranks();
        let replaced = store.replace(preset.id, "Morning v2", &edited, false).await.unwrap();
        assert_eq!(replaced.id, preset.id);
        assert_eq!(replaced.created_at, preset.created_at);
        assert_eq!(store.get(preset.id).await.unwrap().ranks, edited);
        assert_eq!(store.list(route.id).await.unwrap().len(), 1);

        store.delete(preset.id).await.unwrap();
        assert!(matches!(
            store.delete(preset.id).await,
            Err(AppError::Ordering(OrderingError::PresetNotFound(_)))
        ));
    }
}
