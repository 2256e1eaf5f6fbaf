//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::config::environment::EnvironmentConfig;
use crate::models::{LocationId, RouteId};
use crate::repositories::{Repository, RouteRepository};
use crate::services::ordering_session::OrderingSession;
use crate::utils::errors::{not_found_error, AppResult};

type SharedSession = Arc<Mutex<OrderingSession>>;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub repository: Arc<dyn Repository>,
    sessions: Arc<RwLock<HashMap<RouteId, SharedSession>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repository: Arc<dyn Repository>) -> Self {
        Self {
            config,
            repository,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sesión de orden de la ruta, reanudada desde el orden persistido la
    /// primera vez. El guard serializa las operaciones sobre la misma ruta.
    pub async fn session(&self, route_id: RouteId) -> AppResult<OwnedMutexGuard<OrderingSession>> {
        let existing = self.sessions.read().await.get(&route_id).cloned();
        if let Some(session) = existing {
            return Ok(session.lock_owned().await);
        }

        if self.repository.get_route(route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id.to_string()));
        }
        let mut order = self.repository.get_order(route_id).await?;
        if let Some(order) = order.as_mut() {
            let existing: HashSet<LocationId> = self
                .repository
                .list_locations(route_id)
                .await?
                .into_iter()
                .map(|location| location.id)
                .collect();
            if order.retain_locations(&existing) {
                debug!("🧹 Orden de la ruta {} sin ubicaciones borradas", route_id);
            }
        }

        let session = {
            let mut sessions = self.sessions.write().await;
            sessions
                .entry(route_id)
                .or_insert_with(|| {
                    debug!("🆕 Sesión de orden creada para la ruta {}", route_id);
                    Arc::new(Mutex::new(OrderingSession::resume(route_id, order)))
                })
                .clone()
        };
        Ok(session.lock_owned().await)
    }

    /// Cierra la sesión (p. ej. al borrar la ruta)
    pub async fn close_session(&self, route_id: RouteId) {
        self.sessions.write().await.remove(&route_id);
    }
}
