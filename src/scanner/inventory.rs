//! Walk the project tree enumerating asset catalogs and asset sets.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::ScanError;
use super::filter::PathFilter;
use super::models::{AssetType, DiscoveredAsset};

/// Catalog count plus every discovered asset set, sorted by asset path.
#[derive(Debug, Default)]
pub struct Inventory {
    pub asset_catalogs: usize,
    pub assets: Vec<DiscoveredAsset>,
}

/// Nearest enclosing `.xcassets` directory, if any.
fn catalog_path_for_asset(asset_path: &Path) -> Option<PathBuf> {
    asset_path
        .ancestors()
        .skip(1)
        .find(|ancestor| {
            ancestor
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".xcassets"))
        })
        .map(Path::to_path_buf)
}

/// Split `icon.imageset` into a non-empty stem and a recognized asset type.
fn split_asset_set_name(name: &str) -> Option<(&str, AssetType)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    AssetType::from_extension(ext).map(|asset_type| (stem, asset_type))
}

/// Walk `root` in directory-first order collecting catalogs and asset sets.
///
/// Excluded subtrees are skipped entirely. When include rules exist,
/// non-matching directories are still descended so nested matches stay
/// reachable, but nothing outside the includes is counted or emitted.
/// Asset sets outside any catalog are fixtures and are ignored; asset-set
/// directories are never descended into, their contents are not sources.
pub fn collect_assets(
    root: &Path,
    include: &PathFilter,
    exclude: &PathFilter,
) -> Result<Inventory, ScanError> {
    let mut inventory = Inventory::default();
    let mut walker = WalkDir::new(root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(ScanError::from)?;
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        if exclude.matches(rel) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }
        if !include.is_empty() && !include.matches(rel) {
            continue;
        }
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".xcassets") {
            inventory.asset_catalogs += 1;
            continue;
        }
        if let Some((stem, asset_type)) = split_asset_set_name(&name) {
            if let Some(catalog_path) = catalog_path_for_asset(path) {
                inventory.assets.push(DiscoveredAsset {
                    name: stem.to_string(),
                    asset_type,
                    asset_path: path.to_path_buf(),
                    catalog_path,
                });
            }
            walker.skip_current_dir();
        }
    }
    inventory.assets.sort_by(|a, b| a.asset_path.cmp(&b.asset_path));
    Ok(inventory)
}
