//! Model catalog - the fixed list of food models shown in the grid
//!
//! The catalog is built once at startup and shared read-only by every view.
//! Each entry names a bundled 3D asset by a stable identifier, which also
//! keys the shared-element animation (see [`CorrelationKey`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Built-in entries: (display name, stable identifier)
const BUILTIN_ENTRIES: [(&str, &str); 6] = [
    ("🥞 Pancakes", "pancakes"),
    ("🥪 Sandwich", "sandwich"),
    ("🍔 Burger", "burger"),
    ("🥟 Gyoza", "gyoza"),
    ("🍱 Thai", "thai"),
    ("🍕 Pizza", "pizza"),
];

/// Unique identity of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Generate a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a bundled scene asset, relative to the asset root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which visual element of an entry a correlation key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementRole {
    /// The display name text
    Title,
    /// The background shape (grid cell / detail frame)
    Shape,
}

impl ElementRole {
    pub fn suffix(self) -> &'static str {
        match self {
            ElementRole::Title => "title",
            ElementRole::Shape => "shape",
        }
    }
}

/// Key matching an element in the grid with its counterpart in the detail view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationKey {
    identifier: String,
    role: ElementRole,
}

impl CorrelationKey {
    pub fn new(identifier: &str, role: ElementRole) -> Self {
        Self {
            identifier: identifier.to_string(),
            role,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }
}

impl std::fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.identifier, self.role.suffix())
    }
}

/// A single displayable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identity
    pub id: EntryId,
    /// 1-based position in the built-in list
    pub number: u32,
    /// Display name, may include emoji
    pub name: String,
    /// Stable identifier (e.g. "burger")
    pub identifier: String,
    /// Scene asset, absent if it could not be resolved
    pub asset: Option<AssetRef>,
}

impl CatalogEntry {
    /// Correlation key for one of this entry's elements
    pub fn correlation_key(&self, role: ElementRole) -> CorrelationKey {
        CorrelationKey::new(&self.identifier, role)
    }

    pub fn title_key(&self) -> CorrelationKey {
        self.correlation_key(ElementRole::Title)
    }

    pub fn shape_key(&self) -> CorrelationKey {
        self.correlation_key(ElementRole::Shape)
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }
}

/// Where bundled models live and how they are named
#[derive(Debug, Clone)]
pub struct AssetLayout {
    /// Asset root on disk (what the renderer's asset server reads from)
    pub root: PathBuf,
    /// Directory below the root holding the models
    pub models_dir: String,
    /// File extension of model files, without the dot
    pub extension: String,
}

impl AssetLayout {
    /// Asset path (relative to root) for an identifier
    pub fn asset_path(&self, identifier: &str) -> String {
        if self.models_dir.is_empty() {
            format!("{}.{}", identifier, self.extension)
        } else {
            format!(
                "{}/{}.{}",
                self.models_dir.trim_end_matches('/'),
                identifier,
                self.extension
            )
        }
    }

    /// Resolve an identifier to an asset reference if the file is bundled
    pub fn resolve(&self, identifier: &str) -> Option<AssetRef> {
        let relative = self.asset_path(identifier);
        let full = self.root.join(&relative);
        if full.is_file() {
            debug!(path = %full.display(), "Resolved model asset");
            Some(AssetRef(relative))
        } else {
            warn!(
                identifier,
                path = %full.display(),
                "Model asset missing, entry will show an empty scene"
            );
            None
        }
    }
}

/// The fixed, ordered list of catalog entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build the catalog, resolving each entry's asset with `resolve`
    pub fn build_with<F>(mut resolve: F) -> Self
    where
        F: FnMut(&str) -> Option<AssetRef>,
    {
        let entries = BUILTIN_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, (name, identifier))| CatalogEntry {
                id: EntryId::new(),
                number: i as u32 + 1,
                name: name.to_string(),
                identifier: identifier.to_string(),
                asset: resolve(identifier),
            })
            .collect();
        Self { entries }
    }

    /// Build the catalog against bundled files on disk
    pub fn load(layout: &AssetLayout) -> Self {
        let catalog = Self::build_with(|identifier| layout.resolve(identifier));
        let missing = catalog.entries.iter().filter(|e| !e.has_asset()).count();
        debug!(entries = catalog.len(), missing, "Catalog built");
        catalog
    }

    /// Entries in their fixed order
    pub fn list_entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Find an entry by its stable identifier
    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    pub fn by_id(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Asset references of every entry that has one
    pub fn assets(&self) -> impl Iterator<Item = &AssetRef> {
        self.entries.iter().filter_map(|e| e.asset.as_ref())
    }

    /// Pretty JSON listing of the entries
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

/// Absolute path of an asset reference under `root`
pub fn asset_file(root: &Path, asset: &AssetRef) -> PathBuf {
    root.join(asset.as_str())
}
