//! Whole-tree prepass collecting Swift argument labels typed as resources.
//!
//! A parameter declared `icon: ImageResource` in one module makes every
//! `icon: .member` call site in any other module an image reference, so the
//! label map must be complete before per-file matching starts.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use super::error::ScanError;
use super::filter::PathFilter;
use super::models::AssetType;
use super::util;

/// Argument label to the asset types its declarations carry.
pub type LabelAssetTypes = BTreeMap<String, BTreeSet<AssetType>>;

/// `label: ImageResource` / `label: [ColorResource]?` parameter declarations.
/// The optional second identifier covers `external internal: T` label pairs.
static RESOURCE_PARAMETER_RE: OnceLock<Regex> = OnceLock::new();

fn resource_parameter_re() -> &'static Regex {
    RESOURCE_PARAMETER_RE.get_or_init(|| {
        Regex::new(
            r"(?:^|[,(])\s*([A-Za-z_][A-Za-z0-9_]*|_)\s*(?:[A-Za-z_][A-Za-z0-9_]*)?\s*:\s*(?:\[[ \t]*)?(ImageResource|ColorResource)(?:[ \t]*\])?\s*[!?]?",
        )
        .unwrap()
    })
}

/// Record resource-typed parameter labels from one Swift source.
pub(crate) fn collect_labels_from_source(content: &str, labels: &mut LabelAssetTypes) {
    for cap in resource_parameter_re().captures_iter(content) {
        let label = cap[1].trim();
        if label.is_empty() || label == "_" {
            continue;
        }
        let asset_type = match &cap[2] {
            "ImageResource" => AssetType::Image,
            "ColorResource" => AssetType::Color,
            _ => continue,
        };
        labels
            .entry(label.to_string())
            .or_default()
            .insert(asset_type);
    }
}

/// Walk every eligible `.swift` file under `root` and build the label map.
pub fn collect_resource_argument_labels(
    root: &Path,
    include: &PathFilter,
    exclude: &PathFilter,
) -> Result<LabelAssetTypes, ScanError> {
    let mut labels = LabelAssetTypes::new();
    let mut walker = WalkDir::new(root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(ScanError::from)?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            if entry.file_name() == ".git" {
                walker.skip_current_dir();
                continue;
            }
            let rel = path.strip_prefix(root).unwrap_or(path);
            if exclude.matches(rel) {
                walker.skip_current_dir();
            }
            continue;
        }
        if util::has_catalog_ancestor(path) {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        if exclude.matches(rel) {
            continue;
        }
        if !include.is_empty() && !include.matches(rel) {
            continue;
        }
        if util::lowercase_extension(path).as_deref() != Some("swift") {
            continue;
        }
        let content = util::read_source(path)?;
        collect_labels_from_source(&content, &mut labels);
    }
    Ok(labels)
}
