use serde::{Deserialize, Serialize};

use crate::models::SortPreset;
use crate::services::ordering_session::SessionMode;
use crate::services::rank_table::RankTable;

// Request para guardar la tabla de rangos actual como preset
#[derive(Debug, Deserialize)]
pub struct SavePresetRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct SavePresetResponse {
    pub preset: SortPreset,
    /// `true` si reemplazó al preset que se estaba editando
    pub replaced: bool,
}

// Estado de la sesión tras cargar un preset (preview o edición)
#[derive(Debug, Serialize)]
pub struct PresetSessionResponse {
    pub preset: SortPreset,
    pub session: SessionMode,
    pub ranks: RankTable,
}
