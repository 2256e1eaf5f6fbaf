//! Repositorio en memoria
//! 
//! Guarda todo en memoria y, si se configura un archivo, vuelca un snapshot
//! JSON después de cada escritura. La memoria avanza aunque el volcado falle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{ChangelogRepository, PresetRepository, RepoResult, RouteRepository};
use crate::models::{
    ChangelogEntry, Location, LocationId, PresetId, Route, RouteId, RouteOrder, SortPreset,
};

/// Contenido completo del almacenamiento
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryData {
    pub routes: Vec<Route>,
    pub locations: Vec<Location>,
    pub orders: Vec<RouteOrder>,
    pub presets: Vec<SortPreset>,
    pub changelog: Vec<ChangelogEntry>,
}

impl MemoryData {
    /// Datos de ejemplo para arrancar sin backend
    pub fn demo() -> Self {
        let mut data = Self::default();

        let routes = [("KL 7", "PM", "3AVK04"), ("KL 8", "AM", "3AVK05"), ("SG 1", "PM", "2BVK01")];
        let stops: [&[(&str, &str, &str, &str)]; 3] = [
            &[
                ("34", "Wisma Cimb", "Daily", "Daily"),
                ("42", "Plaza Rakyat", "Weekly", "Alt 1"),
                ("51", "KLCC Tower", "Daily", "Alt 2"),
            ],
            &[
                ("67", "Menara TM", "Monthly", "Weekday"),
                ("89", "Pavilion KL", "Daily", "Daily"),
                ("23", "Suria KLCC", "Weekly", "Alt 1"),
            ],
            &[
                ("76", "Mid Valley", "Daily", "Alt 2"),
                ("94", "Bangsar Village", "Weekly", "Weekday"),
                ("31", "Nu Sentral", "Daily", "Daily"),
                ("58", "One Utama", "Monthly", "Alt 1"),
            ],
        ];

        for ((name, shift, warehouse), stops) in routes.into_iter().zip(stops) {
            let route = Route::new(name, shift, warehouse);
            for (code, location_name, delivery, power_mode) in stops {
                let mut location = Location::new(route.id, *code, *location_name);
                location.delivery = delivery.to_string();
                location.power_mode = power_mode.to_string();
                data.locations.push(location);
            }
            data.routes.push(route);
        }

        data
    }
}

pub struct MemoryRepository {
    data: RwLock<MemoryData>,
    snapshot_path: Option<PathBuf>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::from_data(MemoryData::default())
    }

    pub fn from_data(data: MemoryData) -> Self {
        Self {
            data: RwLock::new(data),
            snapshot_path: None,
        }
    }

    /// Carga el snapshot si existe; si no, parte de `fallback`
    pub async fn open(path: impl AsRef<Path>, fallback: MemoryData) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if tokio::fs::try_exists(&path).await? {
            let bytes = tokio::fs::read(&path).await?;
            let data: MemoryData = serde_json::from_slice(&bytes)?;
            info!(
                "📂 Snapshot cargado desde {} ({} rutas, {} ubicaciones, {} presets)",
                path.display(),
                data.routes.len(),
                data.locations.len(),
                data.presets.len()
            );
            data
        } else {
            info!("📂 Snapshot {} no existe, se creará al primer cambio", path.display());
            fallback
        };

        Ok(Self {
            data: RwLock::new(data),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, data: &MemoryData) -> RepoResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("💾 Snapshot escrito en {}", path.display());
        Ok(())
    }
}

fn upsert<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let id = key(&item);
    match items.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[async_trait]
impl RouteRepository for MemoryRepository {
    async fn list_routes(&self) -> RepoResult<Vec<Route>> {
        Ok(self.data.read().await.routes.clone())
    }

    async fn get_route(&self, id: RouteId) -> RepoResult<Option<Route>> {
        let data = self.data.read().await;
        Ok(data.routes.iter().find(|route| route.id == id).cloned())
    }

    async fn save_route(&self, route: Route) -> RepoResult<Route> {
        let mut data = self.data.write().await;
        upsert(&mut data.routes, route.clone(), |r| r.id);
        self.persist(&data).await?;
        Ok(route)
    }

    async fn delete_route(&self, id: RouteId) -> RepoResult<bool> {
        let mut data = self.data.write().await;
        let before = data.routes.len();
        data.routes.retain(|route| route.id != id);
        if data.routes.len() == before {
            return Ok(false);
        }
        data.locations.retain(|location| location.route_id != id);
        data.orders.retain(|order| order.route_id != id);
        data.presets.retain(|preset| preset.route_id != id);
        self.persist(&data).await?;
        Ok(true)
    }

    async fn list_locations(&self, route_id: RouteId) -> RepoResult<Vec<Location>> {
        let data = self.data.read().await;
        Ok(data
            .locations
            .iter()
            .filter(|location| location.route_id == route_id)
            .cloned()
            .collect())
    }

    async fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>> {
        let data = self.data.read().await;
        Ok(data.locations.iter().find(|location| location.id == id).cloned())
    }

    async fn save_location(&self, location: Location) -> RepoResult<Location> {
        let mut data = self.data.write().await;
        upsert(&mut data.locations, location.clone(), |l| l.id);
        self.persist(&data).await?;
        Ok(location)
    }

    async fn delete_location(&self, id: LocationId) -> RepoResult<bool> {
        let mut data = self.data.write().await;
        let before = data.locations.len();
        data.locations.retain(|location| location.id != id);
        let removed = data.locations.len() != before;
        if removed {
            self.persist(&data).await?;
        }
        Ok(removed)
    }

    async fn get_order(&self, route_id: RouteId) -> RepoResult<Option<RouteOrder>> {
        let data = self.data.read().await;
        Ok(data.orders.iter().find(|order| order.route_id == route_id).cloned())
    }

    async fn save_order(&self, order: RouteOrder) -> RepoResult<()> {
        let mut data = self.data.write().await;
        upsert(&mut data.orders, order, |o| o.route_id);
        self.persist(&data).await
    }

    async fn clear_order(&self, route_id: RouteId) -> RepoResult<()> {
        let mut data = self.data.write().await;
        data.orders.retain(|order| order.route_id != route_id);
        self.persist(&data).await
    }
}

#[async_trait]
impl PresetRepository for MemoryRepository {
    async fn list_presets(&self, route_id: RouteId) -> RepoResult<Vec<SortPreset>> {
        let data = self.data.read().await;
        Ok(data
            .presets
            .iter()
            .filter(|preset| preset.route_id == route_id)
            .cloned()
            .collect())
    }

    async fn get_preset(&self, id: PresetId) -> RepoResult<Option<SortPreset>> {
        let data = self.data.read().await;
        Ok(data.presets.iter().find(|preset| preset.id == id).cloned())
    }

    async fn insert_preset(&self, preset: SortPreset) -> RepoResult<()> {
        let mut data = self.data.write().await;
        data.presets.push(preset);
        self.persist(&data).await
    }

    async fn update_preset(&self, preset: SortPreset) -> RepoResult<bool> {
        let mut data = self.data.write().await;
        let Some(existing) = data.presets.iter_mut().find(|p| p.id == preset.id) else {
            return Ok(false);
        };
        *existing = preset;
        self.persist(&data).await?;
        Ok(true)
    }

    async fn delete_preset(&self, id: PresetId) -> RepoResult<Option<SortPreset>> {
        let mut data = self.data.write().await;
        let Some(position) = data.presets.iter().position(|preset| preset.id == id) else {
            return Ok(None);
        };
        let removed = data.presets.remove(position);
        self.persist(&data).await?;
        Ok(Some(removed))
    }
}

#[async_trait]
impl ChangelogRepository for MemoryRepository {
    async fn append_change(&self, entry: ChangelogEntry) -> RepoResult<()> {
        let mut data = self.data.write().await;
        data.changelog.push(entry);
        self.persist(&data).await
    }

    async fn list_changes(
        &self,
        route_id: Option<RouteId>,
        include_archived: bool,
    ) -> RepoResult<Vec<ChangelogEntry>> {
        let data = self.data.read().await;
        let mut entries: Vec<ChangelogEntry> = data
            .changelog
            .iter()
            .filter(|entry| include_archived || !entry.archived)
            .filter(|entry| route_id.is_none() || entry.route_id == route_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn archive_changes_before(&self, cutoff: DateTime<Utc>) -> RepoResult<usize> {
        let mut data = self.data.write().await;
        let mut archived = 0;
        for entry in data.changelog.iter_mut() {
            if !entry.archived && entry.created_at < cutoff {
                entry.archived = true;
                archived += 1;
            }
        }
        if archived > 0 {
            self.persist(&data).await?;
        }
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeAction;
    use crate::services::rank_table::{Rank, RankTable};

    #[tokio::test]
    async fn test_delete_route_cascades() {
        let repo = MemoryRepository::from_data(MemoryData::demo());
        let route = repo.list_routes().await.unwrap()[0].clone();
        let locations = repo.list_locations(route.id).await.unwrap();
        assert_eq!(locations.len(), 3);

        let ranks: RankTable = [(locations[0].id, Rank(1))].into_iter().collect();
        repo.save_order(RouteOrder::new(route.id, vec![locations[0].id], ranks))
            .await
            .unwrap();

        assert!(repo.delete_route(route.id).await.unwrap());
        assert!(repo.list_locations(route.id).await.unwrap().is_empty());
        assert!(repo.get_order(route.id).await.unwrap().is_none());
        assert!(!repo.delete_route(route.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_archive_changes_before() {
        let repo = MemoryRepository::new();
        let mut old = ChangelogEntry::new(None, ChangeAction::RouteCreated, "KL 7");
        old.created_at = Utc::now() - chrono::Duration::days(40);
        repo.append_change(old).await.unwrap();
        repo.append_change(ChangelogEntry::new(None, ChangeAction::RouteUpdated, "KL 7"))
            .await
            .unwrap();

        let archived = repo
            .archive_changes_before(Utc::now() - chrono::Duration::days(30))
            .await
            .unwrap();
        assert_eq!(archived, 1);
        assert_eq!(repo.list_changes(None, false).await.unwrap().len(), 1);
        assert_eq!(repo.list_changes(None, true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_file_round_trip() {
        let path = std::env::temp_dir().join(format!("route_ordering_{}.json", uuid::Uuid::new_v4()));

        let repo = MemoryRepository::open(&path, MemoryData::default()).await.unwrap();
        let route = repo.save_route(Route::new("KL 7", "PM", "3AVK04")).await.unwrap();
        drop(repo);

        let reopened = MemoryRepository::open(&path, MemoryData::default()).await.unwrap();
        let routes = reopened.list_routes().await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].id, route.id);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
