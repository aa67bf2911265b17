//! Orchestrate the scan: inventory, label prepass, worker fan-out, and
//! aggregation into the final used/unused partition.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;

use walkdir::WalkDir;

use super::error::ScanError;
use super::explicit::extract_explicit_references;
use super::filter::PathFilter;
use super::ib::extract_ib_references;
use super::inventory::{collect_assets, Inventory};
use super::labels::collect_resource_argument_labels;
use super::locality::select_closest_assets;
use super::models::{AssetType, DiscoveredAsset, Options, ScanResult};
use super::resources::{
    extract_resource_identifiers, extract_typed_resource_identifiers, CandidateIndex,
};
use super::util;

const SOURCE_EXTENSIONS: &[&str] = &["swift", "m", "h", "xib", "storyboard"];

/// Run the full two-phase scan: enumerate assets, extract references from
/// source files in parallel, and partition every asset into used or unused.
pub fn scan(options: &Options) -> Result<ScanResult, ScanError> {
    let include = PathFilter::new(&options.include);
    let exclude = PathFilter::new(&options.exclude);
    let workers = options.effective_workers();

    let inventory = collect_assets(&options.root, &include, &exclude)?;
    let used_paths =
        collect_used_assets(&options.root, &include, &exclude, &inventory.assets, workers)?;
    Ok(aggregate(inventory, &used_paths))
}

/// Fan out `workers` threads over a bounded file queue and collect the set
/// of asset paths marked used by any reference.
fn collect_used_assets(
    root: &Path,
    include: &PathFilter,
    exclude: &PathFilter,
    assets: &[DiscoveredAsset],
    workers: usize,
) -> Result<HashSet<PathBuf>, ScanError> {
    // Labels declared in one file gate call-site matching in every other
    // file, so the prepass must finish before any worker starts.
    let labels = collect_resource_argument_labels(root, include, exclude)?;

    let mut by_name: HashMap<&str, Vec<&DiscoveredAsset>> = HashMap::new();
    let mut by_type_and_name: HashMap<(AssetType, &str), Vec<&DiscoveredAsset>> = HashMap::new();
    for asset in assets {
        by_name.entry(asset.name.as_str()).or_default().push(asset);
        by_type_and_name
            .entry((asset.asset_type, asset.name.as_str()))
            .or_default()
            .push(asset);
    }
    let candidates = CandidateIndex::build(assets);

    let used: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());
    let first_error: Mutex<Option<ScanError>> = Mutex::new(None);

    // Bounded so a slow worker cannot let the walk outrun memory.
    let (file_tx, file_rx) = crossbeam_channel::bounded::<PathBuf>(workers * 2);

    let walk_result = thread::scope(|scope| {
        for _ in 0..workers {
            let file_rx = file_rx.clone();
            let used = &used;
            let first_error = &first_error;
            let by_name = &by_name;
            let by_type_and_name = &by_type_and_name;
            let candidates = &candidates;
            let labels = &labels;
            scope.spawn(move || {
                for path in file_rx {
                    let content = match util::read_source(&path) {
                        Ok(content) => content,
                        Err(err) => {
                            // Keep draining the queue; an abandoned queue
                            // would block the producer forever.
                            record_first_error(first_error, err);
                            continue;
                        }
                    };
                    let extension = util::lowercase_extension(&path);
                    match extension.as_deref() {
                        Some("xib") | Some("storyboard") => {
                            for name in extract_ib_references(&content) {
                                if let Some(found) = by_name.get(name.as_str()) {
                                    mark_used(used, &path, found);
                                }
                            }
                        }
                        _ => {
                            for reference in extract_explicit_references(&content, labels) {
                                let found = match reference.asset_type {
                                    Some(asset_type) => by_type_and_name
                                        .get(&(asset_type, reference.name.as_str())),
                                    None => by_name.get(reference.name.as_str()),
                                };
                                if let Some(found) = found {
                                    mark_used(used, &path, found);
                                }
                            }
                        }
                    }
                    if extension.as_deref() == Some("swift") {
                        for identifier in extract_typed_resource_identifiers(&content)
                            .into_iter()
                            .chain(extract_resource_identifiers(&content))
                        {
                            if let Some(found) = candidates.get(&identifier) {
                                mark_used(used, &path, found);
                            }
                        }
                    }
                }
            });
        }
        drop(file_rx);

        let walked = walk_source_files(root, include, exclude, &file_tx);
        // Closing the queue lets the workers drain and exit; the scope then
        // joins them.
        drop(file_tx);
        walked
    });

    // A read error from a worker outranks a late walk error.
    if let Some(err) = first_error.into_inner().unwrap() {
        return Err(err);
    }
    walk_result?;
    Ok(used.into_inner().unwrap())
}

/// Push every eligible source file under `root` onto the queue.
fn walk_source_files(
    root: &Path,
    include: &PathFilter,
    exclude: &PathFilter,
    file_tx: &crossbeam_channel::Sender<PathBuf>,
) -> Result<(), ScanError> {
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
        let rel = path.strip_prefix(root).unwrap_or(path);
        if exclude.matches(rel) {
            continue;
        }
        if !include.is_empty() && !include.matches(rel) {
            continue;
        }
        if util::has_catalog_ancestor(path) {
            continue;
        }
        let Some(extension) = util::lowercase_extension(path) else {
            continue;
        };
        if !SOURCE_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }
        if file_tx.send(path.to_path_buf()).is_err() {
            // All workers exited; nothing more can be marked used.
            break;
        }
    }
    Ok(())
}

fn record_first_error(slot: &Mutex<Option<ScanError>>, err: ScanError) {
    let mut slot = slot.lock().unwrap();
    if slot.is_none() {
        *slot = Some(err);
    }
}

/// Resolve a reference against its candidate assets, apply the locality
/// tie-break, and record the winners.
fn mark_used(used: &Mutex<HashSet<PathBuf>>, source_path: &Path, candidates: &[&DiscoveredAsset]) {
    let selected = select_closest_assets(source_path, candidates);
    if selected.is_empty() {
        return;
    }
    let mut used = used.lock().unwrap();
    for asset in selected {
        used.insert(asset.asset_path.clone());
    }
}

/// Build the sorted summary lists and per-catalog groupings. Runs single
/// threaded after the worker fan-in, which is what makes the output
/// deterministic even though extraction order is not.
fn aggregate(inventory: Inventory, used_paths: &HashSet<PathBuf>) -> ScanResult {
    let summary_name = summary_namer(&inventory.assets);
    let mut asset_names: BTreeSet<String> = BTreeSet::new();
    let mut used_names: BTreeSet<String> = BTreeSet::new();
    let mut unused_names: BTreeSet<String> = BTreeSet::new();
    let mut unused_by_catalog: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for asset in &inventory.assets {
        let name = summary_name(asset);
        asset_names.insert(name.clone());
        if used_paths.contains(&asset.asset_path) {
            used_names.insert(name);
            continue;
        }
        unused_names.insert(name);
        unused_by_catalog
            .entry(asset.catalog_path.clone())
            .or_default()
            .push(asset.asset_path.clone());
    }

    // A summary identifier marked used anywhere never also reads as unused;
    // the grouped per-catalog paths still record the stale copies.
    let unused_assets: Vec<String> = unused_names.difference(&used_names).cloned().collect();
    for paths in unused_by_catalog.values_mut() {
        paths.sort();
    }

    ScanResult {
        asset_catalogs: inventory.asset_catalogs,
        asset_names: asset_names.into_iter().collect(),
        used_assets: used_names.into_iter().collect(),
        unused_assets,
        unused_by_catalog,
    }
}

/// Summary identifiers are bare asset names unless multiple asset types
/// share the name anywhere in the tree, in which case every such asset
/// reads as `name.asset_type`.
fn summary_namer(assets: &[DiscoveredAsset]) -> impl Fn(&DiscoveredAsset) -> String {
    let mut types_by_name: HashMap<&str, HashSet<AssetType>> = HashMap::new();
    for asset in assets {
        types_by_name
            .entry(asset.name.as_str())
            .or_default()
            .insert(asset.asset_type);
    }
    let collisions: HashSet<String> = types_by_name
        .into_iter()
        .filter(|(_, types)| types.len() > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    move |asset: &DiscoveredAsset| {
        if collisions.contains(&asset.name) {
            format!("{}.{}", asset.name, asset.asset_type.extension())
        } else {
            asset.name.clone()
        }
    }
}
