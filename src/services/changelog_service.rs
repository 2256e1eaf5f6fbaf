//! Historial de cambios
//! 
//! Registro de auditoría de las operaciones que modifican datos y barrido
//! periódico que archiva las entradas antiguas.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::{ChangeAction, ChangelogEntry, RouteId};
use crate::repositories::{ChangelogRepository, Repository};
use crate::utils::errors::StorageError;

/// Registra un cambio. Un fallo del historial nunca aborta la operación.
pub async fn record<R: ChangelogRepository + ?Sized>(
    repository: &R,
    route_id: Option<RouteId>,
    action: ChangeAction,
    detail: impl Into<String>,
) {
    let entry = ChangelogEntry::new(route_id, action, detail);
    if let Err(e) = repository.append_change(entry).await {
        warn!("⚠️ No se pudo registrar el cambio {:?}: {}", action, e);
    }
}

/// Archiva las entradas con más de `max_age` de antigüedad
pub async fn archive_sweep<R: ChangelogRepository + ?Sized>(
    repository: &R,
    max_age: ChronoDuration,
) -> Result<usize, StorageError> {
    let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
        warn!("⚠️ Antigüedad de archivado fuera de rango: {}", max_age);
        return Ok(0);
    };
    let archived = repository.archive_changes_before(cutoff).await?;
    if archived > 0 {
        info!("🗄️ {} entradas del historial archivadas", archived);
    }
    Ok(archived)
}

/// Lanza el barrido periódico en background
pub fn spawn_archive_sweep(
    repository: Arc<dyn Repository>,
    every: Duration,
    max_age: ChronoDuration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = archive_sweep(repository.as_ref(), max_age).await {
                warn!("⚠️ Error en el barrido del historial: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryRepository;

    #[tokio::test]
    async fn test_record_and_sweep() {
        let repo = MemoryRepository::new();
        let route_id = RouteId::new();
        record(&repo, Some(route_id), ChangeAction::OrderApplied, "3 ubicaciones").await;

        let mut old = ChangelogEntry::new(Some(route_id), ChangeAction::OrderReset, "");
        old.created_at = Utc::now() - ChronoDuration::days(31);
        repo.append_change(old).await.unwrap();

        let archived = archive_sweep(&repo, ChronoDuration::days(30)).await.unwrap();
        assert_eq!(archived, 1);

        let visible = repo.list_changes(Some(route_id), false).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].action, ChangeAction::OrderApplied);
    }

    #[tokio::test]
    async fn test_sweep_with_out_of_range_age_archives_nothing() {
        let repo = MemoryRepository::new();
        let mut old = ChangelogEntry::new(None, ChangeAction::RouteCreated, "KL 7");
        old.created_at = Utc::now() - ChronoDuration::days(365);
        repo.append_change(old).await.unwrap();

        let archived = archive_sweep(&repo, ChronoDuration::MAX).await.unwrap();
        assert_eq!(archived, 0);
        assert_eq!(repo.list_changes(None, false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_sweep_runs() {
        let repo = Arc::new(MemoryRepository::new());
        let mut old = ChangelogEntry::new(None, ChangeAction::RouteCreated, "KL 7");
        old.created_at = Utc::now() - ChronoDuration::days(2);
        repo.append_change(old).await.unwrap();

        let handle = spawn_archive_sweep(repo.clone(), Duration::from_millis(10), ChronoDuration::days(1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(repo.list_changes(None, false).await.unwrap().is_empty());
    }
}
