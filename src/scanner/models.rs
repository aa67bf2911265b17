//! Data models for asset discovery and scan results.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// The three asset-set flavors an `.xcassets` catalog can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetType {
    Image,
    Color,
    Data,
}

impl AssetType {
    /// Directory extension for this asset-set type, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            AssetType::Image => "imageset",
            AssetType::Color => "colorset",
            AssetType::Data => "dataset",
        }
    }

    /// Parse an asset-set directory extension (no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "imageset" => Some(AssetType::Image),
            "colorset" => Some(AssetType::Color),
            "dataset" => Some(AssetType::Data),
            _ => None,
        }
    }
}

/// An asset-set directory found inside an `.xcassets` catalog.
///
/// `catalog_path` is the nearest enclosing `.xcassets` directory and is
/// always a prefix of `asset_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAsset {
    /// Directory basename with the asset-set extension stripped.
    pub name: String,
    pub asset_type: AssetType,
    pub asset_path: PathBuf,
    pub catalog_path: PathBuf,
}

/// A reference emitted by a source matcher. A present `asset_type` narrows
/// resolution to that flavor; `None` resolves against any flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub name: String,
    pub asset_type: Option<AssetType>,
}

/// Inputs for [`scan`](super::scan).
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Root directory of the project tree.
    pub root: PathBuf,
    /// Include patterns; empty means everything.
    pub include: Vec<String>,
    /// Exclude patterns (directory prefixes or globs).
    pub exclude: Vec<String>,
    /// Worker thread count; `0` means the logical CPU count.
    pub workers: usize,
}

impl Options {
    pub(crate) fn effective_workers(&self) -> usize {
        if self.workers >= 1 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Outcome of a full scan: the used/unused partition and its groupings.
///
/// All lists are sorted lexicographically and free of duplicates, and a
/// summary identifier never appears in both `used_assets` and
/// `unused_assets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Number of `.xcassets` catalogs under the root.
    pub asset_catalogs: usize,
    /// Summary identifiers of every discovered asset.
    pub asset_names: Vec<String>,
    pub used_assets: Vec<String>,
    pub unused_assets: Vec<String>,
    /// Catalog path to the sorted asset-set paths under it that were never
    /// marked used.
    pub unused_by_catalog: BTreeMap<PathBuf, Vec<PathBuf>>,
}
