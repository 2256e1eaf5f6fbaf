//! Tabla de rangos
//! 
//! Mapa disperso `LocationId -> Rank` que el usuario edita para definir un
//! orden manual. Una entrada ausente significa "sin preferencia".

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::models::LocationId;

/// Rango asignado por el usuario (entero no negativo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Rank {
    /// Interpreta la entrada cruda del usuario.
    ///
    /// `""` limpia el rango (`Some(None)`), una cadena de dígitos lo fija
    /// (`Some(Some(rank))`) y cualquier otra cosa se rechaza (`None`).
    pub fn parse_input(raw: &str) -> Option<Option<Rank>> {
        if raw.is_empty() {
            return Some(None);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<u32>().ok().map(|value| Some(Rank(value)))
    }
}

/// Resultado de `set_rank`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankUpdate {
    Set(Rank),
    Cleared,
    /// Entrada no numérica: se conserva el valor anterior
    Rejected,
}

/// Tabla de rangos de una sesión de edición de ruta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    ranks: BTreeMap<LocationId, Rank>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aplica la entrada cruda del usuario para una ubicación
    pub fn set_rank(&mut self, location_id: LocationId, raw: &str) -> RankUpdate {
        match Rank::parse_input(raw) {
            Some(Some(rank)) => {
                self.ranks.insert(location_id, rank);
                RankUpdate::Set(rank)
            }
            Some(None) => {
                self.ranks.remove(&location_id);
                RankUpdate::Cleared
            }
            None => RankUpdate::Rejected,
        }
    }

    pub fn set(&mut self, location_id: LocationId, rank: Option<Rank>) {
        match rank {
            Some(rank) => {
                self.ranks.insert(location_id, rank);
            }
            None => {
                self.ranks.remove(&location_id);
            }
        }
    }

    pub fn get(&self, location_id: &LocationId) -> Option<Rank> {
        self.ranks.get(location_id).copied()
    }

    /// `true` si `rank` está fijado y otra ubicación tiene exactamente el mismo valor
    pub fn is_duplicate(&self, location_id: &LocationId, rank: Option<Rank>) -> bool {
        let Some(rank) = rank else {
            return false;
        };
        self.ranks
            .iter()
            .any(|(other_id, other_rank)| other_id != location_id && *other_rank == rank)
    }

    /// Habilita "Apply": al menos una entrada fijada
    pub fn has_any_rank(&self) -> bool {
        !self.ranks.is_empty()
    }

    /// Rangos repetidos con las ubicaciones que los comparten, ordenados por rango
    pub fn duplicate_ranks(&self) -> Vec<(Rank, Vec<LocationId>)> {
        let mut by_rank: BTreeMap<Rank, Vec<LocationId>> = BTreeMap::new();
        for (location_id, rank) in &self.ranks {
            by_rank.entry(*rank).or_default().push(*location_id);
        }
        by_rank
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect()
    }

    /// Descarta entradas de ubicaciones que ya no existen
    pub fn retain_locations(&mut self, existing: &HashSet<LocationId>) {
        self.ranks.retain(|location_id, _| existing.contains(location_id));
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranks.clear();
    }
}

impl FromIterator<(LocationId, Rank)> for RankTable {
    fn from_iter<I: IntoIterator<Item = (LocationId, Rank)>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().collect(),
        }
    }
}
