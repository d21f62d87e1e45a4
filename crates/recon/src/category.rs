//! Sort-category resolution against an external card metadata table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ReconError;

pub const GOLD: &str = "Gold";
pub const LAND: &str = "Land";
pub const COLORLESS: &str = "Colorless";
pub const UNKNOWN: &str = "Unknown";

/// Separator between the faces of a split or double-faced card name.
pub const SPLIT_SEPARATOR: &str = "//";

/// Metadata for one card name. Extra fields in the source JSON are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardMeta {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Name → metadata table, read-only for a run.
#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    cards: HashMap<String, CardMeta>,
    /// Front face → full key, for keys that contain the split separator.
    /// Consulted only by the split-name fallback.
    front_faces: HashMap<String, String>,
}

impl CardLibrary {
    pub fn new(cards: HashMap<String, CardMeta>) -> Self {
        let mut keys: Vec<&String> = cards.keys().collect();
        keys.sort();

        let mut front_faces = HashMap::new();
        for key in keys {
            if let Some(front) = front_face(key) {
                // Lexicographically first key wins when split cards share a front face.
                front_faces.entry(front.to_string()).or_insert_with(|| key.clone());
            }
        }
        Self { cards, front_faces }
    }

    /// Parse a JSON object keyed by card name.
    pub fn from_json(json: &str) -> Result<Self, ReconError> {
        let cards: HashMap<String, CardMeta> =
            serde_json::from_str(json).map_err(|e| ReconError::LibraryParse(e.to_string()))?;
        Ok(Self::new(cards))
    }

    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        let library = Self::from_json(&json)?;
        log::info!("loaded {} cards from {}", library.len(), path.display());
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Exact name lookup.
    pub fn get(&self, name: &str) -> Option<&CardMeta> {
        self.cards.get(name)
    }

    /// Split card listed under a full `front // back` key whose front face is `front`.
    fn split_card(&self, front: &str) -> Option<&CardMeta> {
        self.front_faces.get(front).and_then(|key| self.cards.get(key))
    }

    /// Resolve a display name to its sort category.
    pub fn resolve(&self, name: &str) -> String {
        resolve_at_depth(self, name, 0)
    }
}

/// Split-name fallback recurses at most this many times.
const MAX_SPLIT_DEPTH: usize = 1;

fn resolve_at_depth(library: &CardLibrary, name: &str, depth: usize) -> String {
    if let Some(meta) = library.get(name) {
        return category_for(meta);
    }

    if depth < MAX_SPLIT_DEPTH {
        if let Some(front) = front_face(name) {
            if let Some(meta) = library.split_card(front) {
                return category_for(meta);
            }
            return resolve_at_depth(library, front, depth + 1);
        }
    }

    log::debug!("no category for {name:?}");
    UNKNOWN.to_string()
}

fn category_for(meta: &CardMeta) -> String {
    match meta.colors.as_slice() {
        [] if meta.types.iter().any(|t| t == LAND) => LAND.to_string(),
        [] => COLORLESS.to_string(),
        [color] => color_name(color).to_string(),
        _ => GOLD.to_string(),
    }
}

/// Single-letter color codes map to names; anything else passes through.
fn color_name(color: &str) -> &str {
    match color {
        "W" => "White",
        "U" => "Blue",
        "B" => "Black",
        "R" => "Red",
        "G" => "Green",
        other => other,
    }
}

/// Trimmed text before the split separator, if there is one.
fn front_face(name: &str) -> Option<&str> {
    name.split_once(SPLIT_SEPARATOR).map(|(front, _)| front.trim())
}
