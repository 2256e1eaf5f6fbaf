use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use route_ordering::config::environment::EnvironmentConfig;
use route_ordering::create_app;
use route_ordering::repositories::memory_repository::{MemoryData, MemoryRepository};
use route_ordering::repositories::Repository;
use route_ordering::services::changelog_service::spawn_archive_sweep;
use route_ordering::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Route Ordering - Orden de paradas por ruta");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    config.log();

    // Inicializar almacenamiento
    let fallback = if config.seed_demo_data {
        MemoryData::demo()
    } else {
        MemoryData::default()
    };
    let repository = match &config.data_file {
        Some(path) => match MemoryRepository::open(path, fallback).await {
            Ok(repository) => {
                info!("✅ Datos cargados desde {}", path.display());
                repository
            }
            Err(e) => {
                error!("❌ Error abriendo {}: {}", path.display(), e);
                return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
            }
        },
        None => {
            warn!("⚠️ DATA_FILE no configurado, los datos solo viven en memoria");
            MemoryRepository::from_data(fallback)
        }
    };
    let repository: Arc<dyn Repository> = Arc::new(repository);

    // Archivado periódico del historial
    let max_age = chrono::Duration::try_days(config.changelog_archive_after_days).ok_or_else(|| {
        anyhow::anyhow!(
            "CHANGELOG_ARCHIVE_AFTER_DAYS fuera de rango: {}",
            config.changelog_archive_after_days
        )
    })?;
    let sweep = spawn_archive_sweep(repository.clone(), config.changelog_sweep_interval, max_age);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = create_app(AppState::new(config, repository));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🗺️ Rutas y ubicaciones:");
    info!("   GET/POST /api/routes - Listar/crear rutas");
    info!("   GET/PUT/DELETE /api/routes/:id - Obtener/actualizar/eliminar ruta");
    info!("   GET/POST /api/routes/:id/locations - Ubicaciones de la ruta");
    info!("   PUT/DELETE /api/locations/:id - Actualizar/eliminar ubicación");
    info!("   POST/DELETE /api/locations/:id/images - Imágenes de la ubicación");
    info!("🔢 Orden personalizado:");
    info!("   GET  /api/routes/:id/ordering - Vista de orden con distancias");
    info!("   PUT  /api/routes/:id/ranks/:location_id - Asignar rango");
    info!("   POST /api/routes/:id/ordering/apply - Aplicar orden");
    info!("   POST /api/routes/:id/ordering/cancel - Descartar cambios");
    info!("   DELETE /api/routes/:id/order - Restablecer orden por código");
    info!("💾 Presets:");
    info!("   GET/POST /api/routes/:id/presets - Listar/guardar presets");
    info!("   POST /api/routes/:id/presets/:preset_id/preview - Previsualizar preset");
    info!("   POST /api/routes/:id/presets/:preset_id/edit - Editar preset");
    info!("   PATCH /api/presets/:preset_id/visibility - Cambiar visibilidad");
    info!("   DELETE /api/presets/:preset_id - Eliminar preset");
    info!("📜 Sistema:");
    info!("   GET  /api/origin - Punto de origen");
    info!("   GET  /api/changelog - Historial de cambios");
    info!("   POST /api/edit-mode/verify - Verificar frase de edición");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    sweep.abort();
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
