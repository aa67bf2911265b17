//! CLI: argument parsing, subcommand logic, and output rendering.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::scanner::{self, Options, ScanError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_UNUSED_ASSETS: i32 = 3;

const DEFAULT_EXCLUDES: &[&str] = &["Pods/", "Carthage/", "SourcePackages/", ".build/", "vendor/"];

#[derive(Parser)]
#[command(name = "assetsweep")]
#[command(about = "Find and prune unused .xcassets entries in Xcode project trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format: json|table|markdown (default: json, or ASSETSWEEP_DEFAULT_OUTPUT)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan project assets and references
    Scan(ScanArgs),
    /// Detect unused assets
    Unused(ScanArgs),
    /// Prune unused assets (dry-run by default)
    Prune(PruneArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Path to scan
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Include path globs (repeatable or comma-separated)
    #[arg(long = "include", value_name = "GLOB", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Exclude path globs (repeatable or comma-separated)
    #[arg(
        long = "exclude",
        value_name = "GLOB",
        value_delimiter = ',',
        default_values = ["Pods/", "Carthage/", "SourcePackages/", ".build/", "vendor/"]
    )]
    pub exclude: Vec<String>,

    /// Worker count (default: ASSETSWEEP_WORKERS or the logical CPU count)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,
}

#[derive(Args)]
pub struct PruneArgs {
    /// Path to scan
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Apply deletions
    #[arg(long)]
    pub apply: bool,

    /// Override safety checks for --apply
    #[arg(long)]
    pub force: bool,
}

/// CLI failures mapped to exit codes and the stderr error envelope.
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("unused assets detected")]
    UnusedAssetsFound,
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Runtime(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Table,
    Markdown,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    command: String,
    path: String,
    include: Vec<String>,
    exclude: Vec<String>,
    workers: usize,
    summary: ScanSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanSummary {
    asset_catalogs: usize,
    asset_sets: usize,
    used_assets: usize,
    unused_assets: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnusedReport {
    command: String,
    path: String,
    unused_count: usize,
    prune_candidate_count: usize,
    unused: Vec<String>,
    unused_by_file: BTreeMap<String, UnusedFileEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnusedFileEntry {
    unused_assets: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PruneReport {
    command: String,
    path: String,
    apply: bool,
    force: bool,
    unused_count: usize,
    prune_candidate_count: usize,
    deleted: Vec<String>,
    dry_run: bool,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

/// Parse `args` and run the selected subcommand, writing results to
/// `stdout` and a JSON error envelope to `stderr` on failure. Returns the
/// process exit code.
pub fn execute<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = write!(stdout, "{err}");
                return EXIT_SUCCESS;
            }
            let rendered = err.to_string();
            let message = rendered.lines().next().unwrap_or("invalid arguments");
            write_error(stderr, "usage_error", message);
            return EXIT_USAGE;
        }
    };

    let output = match resolve_output(cli.output.as_deref()) {
        Ok(output) => output,
        Err(err) => return fail(stderr, err),
    };

    let result = match &cli.command {
        Command::Scan(args) => run_scan(args, output, stdout),
        Command::Unused(args) => run_unused(args, output, stdout),
        Command::Prune(args) => run_prune(args, output, stdout),
    };
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => fail(stderr, err),
    }
}

fn fail(stderr: &mut dyn Write, err: CliError) -> i32 {
    match err {
        CliError::Usage(message) => {
            write_error(stderr, "usage_error", &message);
            EXIT_USAGE
        }
        CliError::UnusedAssetsFound => EXIT_UNUSED_ASSETS,
        other => {
            write_error(stderr, "runtime_error", &other.to_string());
            EXIT_FAILURE
        }
    }
}

fn write_error(stderr: &mut dyn Write, code: &str, message: &str) {
    let envelope = ErrorEnvelope {
        error: ErrorBody { code, message },
    };
    if let Ok(payload) = serde_json::to_string(&envelope) {
        let _ = writeln!(stderr, "{payload}");
    }
}

fn parse_output(value: &str) -> Option<OutputFormat> {
    match value {
        "json" => Some(OutputFormat::Json),
        "table" => Some(OutputFormat::Table),
        "markdown" => Some(OutputFormat::Markdown),
        _ => None,
    }
}

fn resolve_output(flag: Option<&str>) -> Result<OutputFormat, CliError> {
    match flag {
        Some(value) => parse_output(value).ok_or_else(|| {
            CliError::Usage(format!(
                "invalid value for --output: {value:?} (allowed: json, table, markdown)"
            ))
        }),
        None => Ok(default_output()),
    }
}

/// ASSETSWEEP_DEFAULT_OUTPUT picks the format when --output is absent.
/// Unset or invalid values fall back to JSON rather than erroring.
fn default_output() -> OutputFormat {
    match std::env::var("ASSETSWEEP_DEFAULT_OUTPUT") {
        Ok(value) => parse_output(value.trim().to_ascii_lowercase().as_str())
            .unwrap_or(OutputFormat::Json),
        Err(_) => OutputFormat::Json,
    }
}

fn resolve_workers(flag: Option<usize>) -> Result<usize, CliError> {
    match flag {
        Some(0) => Err(CliError::Usage(
            "invalid value for --workers: must be >= 1".to_string(),
        )),
        Some(n) => Ok(n),
        None => Ok(default_workers()),
    }
}

/// ASSETSWEEP_WORKERS overrides the logical CPU count when it parses as a
/// positive integer.
fn default_workers() -> usize {
    if let Ok(value) = std::env::var("ASSETSWEEP_WORKERS") {
        if let Ok(n) = value.trim().parse::<usize>() {
            if n > 0 {
                return n;
            }
        }
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn expand_tilde_path(path: &str) -> Result<PathBuf, CliError> {
    if path == "~" || path.starts_with("~/") {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| CliError::Runtime("failed to resolve home directory".to_string()))?;
        if path == "~" {
            return Ok(home);
        }
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}

/// Expand `~`, absolutize, and require an existing directory.
fn resolve_scan_path(path: &str) -> Result<PathBuf, CliError> {
    let expanded = expand_tilde_path(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };
    let metadata = std::fs::metadata(&absolute).map_err(|_| {
        CliError::Runtime(format!(
            "path does not exist or is inaccessible: {}",
            absolute.display()
        ))
    })?;
    if !metadata.is_dir() {
        return Err(CliError::Runtime(format!(
            "path is not a directory: {}",
            absolute.display()
        )));
    }
    Ok(absolute)
}

fn sorted_patterns(patterns: &[String]) -> Vec<String> {
    let mut sorted = patterns.to_vec();
    sorted.sort();
    sorted
}

/// Directory-prefix rules are always valid; everything else must compile as
/// a glob. Runs before the scanner so bad patterns are usage errors.
fn validate_glob_patterns(patterns: &[String], flag: &str) -> Result<(), CliError> {
    for pattern in patterns {
        let normalized = scanner::normalize_pattern(pattern.trim());
        if normalized.is_empty() || normalized.ends_with('/') {
            continue;
        }
        if let Err(err) = glob::Pattern::new(&normalized) {
            return Err(CliError::Usage(format!(
                "invalid value for --{flag}: {pattern:?} ({err})"
            )));
        }
    }
    Ok(())
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

fn run_scan(args: &ScanArgs, output: OutputFormat, stdout: &mut dyn Write) -> Result<(), CliError> {
    let root = resolve_scan_path(&args.path)?;
    let workers = resolve_workers(args.workers)?;
    let include = sorted_patterns(&args.include);
    let exclude = sorted_patterns(&args.exclude);
    validate_glob_patterns(&include, "include")?;
    validate_glob_patterns(&exclude, "exclude")?;

    let scan = scanner::scan(&Options {
        root: root.clone(),
        include: include.clone(),
        exclude: exclude.clone(),
        workers,
    })?;

    let report = ScanReport {
        command: "scan".to_string(),
        path: root.display().to_string(),
        include,
        exclude,
        workers,
        summary: ScanSummary {
            asset_catalogs: scan.asset_catalogs,
            asset_sets: scan.asset_names.len(),
            used_assets: scan.used_assets.len(),
            unused_assets: scan.unused_assets.len(),
        },
    };
    render_scan(stdout, output, &report)
}

fn run_unused(
    args: &ScanArgs,
    output: OutputFormat,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let root = resolve_scan_path(&args.path)?;
    let workers = resolve_workers(args.workers)?;
    let include = sorted_patterns(&args.include);
    let exclude = sorted_patterns(&args.exclude);
    validate_glob_patterns(&include, "include")?;
    validate_glob_patterns(&exclude, "exclude")?;

    let scan = scanner::scan(&Options {
        root: root.clone(),
        include,
        exclude,
        workers,
    })?;

    let prune_candidates = collect_prune_targets(&scan.unused_by_catalog);
    let unused_by_file = build_unused_by_file(&scan.unused_by_catalog);
    // With duplicates across catalogs every name can be "used" somewhere
    // while stale copies remain; surface those via the grouped basenames.
    let unused_summary = if scan.unused_assets.is_empty() && !unused_by_file.is_empty() {
        flatten_unused_names(&unused_by_file)
    } else {
        scan.unused_assets.clone()
    };

    let report = UnusedReport {
        command: "unused".to_string(),
        path: root.display().to_string(),
        unused_count: unused_summary.len(),
        prune_candidate_count: prune_candidates.len(),
        unused: unused_summary,
        unused_by_file,
    };
    render_unused(stdout, output, &report)?;
    if report.unused_count > 0 {
        return Err(CliError::UnusedAssetsFound);
    }
    Ok(())
}

fn run_prune(
    args: &PruneArgs,
    output: OutputFormat,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let root = resolve_scan_path(&args.path)?;
    if args.force && !args.apply {
        return Err(CliError::Usage("--force requires --apply".to_string()));
    }

    // Prune scans with the stock excludes and worker default so delete
    // candidates stay deterministic across local and CI runs.
    let scan = scanner::scan(&Options {
        root: root.clone(),
        include: Vec::new(),
        exclude: default_excludes(),
        workers: default_workers(),
    })?;

    let prune_targets = collect_prune_targets(&scan.unused_by_catalog);
    if args.apply {
        if !args.force {
            require_clean_git_working_tree(&root)?;
        }
        delete_prune_targets(&root, &prune_targets)?;
    }

    let report = PruneReport {
        command: "prune".to_string(),
        path: root.display().to_string(),
        apply: args.apply,
        force: args.force,
        unused_count: scan.unused_assets.len(),
        prune_candidate_count: prune_targets.len(),
        deleted: prune_targets
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
        dry_run: !args.apply,
    };
    render_prune(stdout, output, &report)
}

/// Unique unused asset-set paths; the only things prune may touch.
fn collect_prune_targets(grouped: &BTreeMap<PathBuf, Vec<PathBuf>>) -> Vec<PathBuf> {
    let mut targets = BTreeSet::new();
    for paths in grouped.values() {
        for path in paths {
            if is_prunable_asset_set_path(path) {
                targets.insert(path.clone());
            }
        }
    }
    targets.into_iter().collect()
}

fn is_prunable_asset_set_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("imageset" | "colorset" | "dataset")
    )
}

fn build_unused_by_file(
    grouped: &BTreeMap<PathBuf, Vec<PathBuf>>,
) -> BTreeMap<String, UnusedFileEntry> {
    grouped
        .iter()
        .map(|(catalog, asset_paths)| {
            (
                catalog.display().to_string(),
                UnusedFileEntry {
                    unused_assets: unused_display_names(asset_paths),
                },
            )
        })
        .collect()
}

/// Basenames for one catalog group, keeping the asset-set extension only
/// when multiple asset types share a name within the group.
fn unused_display_names(asset_paths: &[PathBuf]) -> Vec<String> {
    let mut types_by_name: HashMap<String, HashSet<String>> = HashMap::new();
    let mut labels = Vec::with_capacity(asset_paths.len());
    for path in asset_paths {
        let base = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let (name, ext) = match base.rsplit_once('.') {
            Some((name, ext)) => (name.to_string(), ext.to_string()),
            None => (base.to_string(), String::new()),
        };
        types_by_name
            .entry(name.clone())
            .or_default()
            .insert(ext.clone());
        labels.push((name, ext));
    }
    let mut out: Vec<String> = labels
        .into_iter()
        .map(|(name, ext)| {
            if !ext.is_empty() && types_by_name[&name].len() > 1 {
                format!("{name}.{ext}")
            } else {
                name
            }
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

fn flatten_unused_names(grouped: &BTreeMap<String, UnusedFileEntry>) -> Vec<String> {
    let mut all: Vec<String> = grouped
        .values()
        .flat_map(|entry| entry.unused_assets.iter().cloned())
        .collect();
    all.sort();
    all.dedup();
    all
}

/// `git status --porcelain` must report nothing before prune may delete.
fn require_clean_git_working_tree(root: &Path) -> Result<(), CliError> {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["status", "--porcelain"])
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C")
        .output()
        .map_err(|err| CliError::Runtime(format!("failed to check git working tree: {err}")))?;
    if !output.status.success() {
        let diagnostic = String::from_utf8_lossy(&output.stderr);
        let diagnostic = diagnostic.trim();
        if diagnostic.is_empty() {
            return Err(CliError::Runtime(format!(
                "failed to check git working tree: git exited with {}",
                output.status
            )));
        }
        return Err(CliError::Runtime(format!(
            "failed to check git working tree: {diagnostic}"
        )));
    }
    if output.stdout.iter().any(|b| !b.is_ascii_whitespace()) {
        return Err(CliError::Runtime(
            "git working tree is not clean; commit/stash changes or rerun with --force".to_string(),
        ));
    }
    Ok(())
}

/// Delete prune targets, confining every resolved path to the resolved
/// root. A symlinked target pointing outside the root is rejected and left
/// in place.
fn delete_prune_targets(root: &Path, targets: &[PathBuf]) -> Result<(), CliError> {
    if targets.is_empty() {
        return Ok(());
    }
    let resolved_root = std::fs::canonicalize(root).map_err(|err| {
        CliError::Runtime(format!(
            "failed to resolve prune root {}: {err}",
            root.display()
        ))
    })?;
    for target in targets {
        if !is_prunable_asset_set_path(target) {
            return Err(CliError::Runtime(format!(
                "refusing to delete non-asset-set path: {}",
                target.display()
            )));
        }
        let resolved = std::fs::canonicalize(target).map_err(|err| {
            CliError::Runtime(format!("failed to resolve {}: {err}", target.display()))
        })?;
        if !resolved.starts_with(&resolved_root) {
            return Err(CliError::Runtime(format!(
                "refusing to delete {}: resolved target lies outside root {}",
                target.display(),
                resolved_root.display()
            )));
        }
        std::fs::remove_dir_all(target).map_err(|err| {
            CliError::Runtime(format!("failed to delete {}: {err}", target.display()))
        })?;
    }
    Ok(())
}

fn write_json<T: Serialize>(w: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string(value)?;
    writeln!(w, "{payload}")?;
    Ok(())
}

fn render_scan(
    w: &mut dyn Write,
    output: OutputFormat,
    report: &ScanReport,
) -> Result<(), CliError> {
    match output {
        OutputFormat::Json => write_json(w, report),
        OutputFormat::Table => {
            writeln!(
                w,
                "command  path  workers  asset_catalogs  asset_sets  used_assets  unused_assets"
            )?;
            writeln!(
                w,
                "{}  {}  {}  {}  {}  {}  {}",
                report.command,
                report.path,
                report.workers,
                report.summary.asset_catalogs,
                report.summary.asset_sets,
                report.summary.used_assets,
                report.summary.unused_assets
            )?;
            Ok(())
        }
        OutputFormat::Markdown => {
            writeln!(
                w,
                "| command | path | workers | asset_catalogs | asset_sets | used_assets | unused_assets |"
            )?;
            writeln!(w, "|---|---|---:|---:|---:|---:|---:|")?;
            writeln!(
                w,
                "| {} | {} | {} | {} | {} | {} | {} |",
                report.command,
                report.path,
                report.workers,
                report.summary.asset_catalogs,
                report.summary.asset_sets,
                report.summary.used_assets,
                report.summary.unused_assets
            )?;
            Ok(())
        }
    }
}

fn render_unused(
    w: &mut dyn Write,
    output: OutputFormat,
    report: &UnusedReport,
) -> Result<(), CliError> {
    match output {
        OutputFormat::Json => write_json(w, report),
        OutputFormat::Table => {
            writeln!(w, "Summary")?;
            writeln!(w, "  Command:                {}", report.command)?;
            writeln!(w, "  Path:                   {}", report.path)?;
            writeln!(w, "  Unused Count:           {}", report.unused_count)?;
            writeln!(w, "  Prune Candidate Count:  {}", report.prune_candidate_count)?;
            if !report.unused.is_empty() {
                writeln!(w, "\nUnused Assets (Grouped By Catalog)")?;
                for (catalog, entry) in &report.unused_by_file {
                    writeln!(w, "{catalog}")?;
                    for asset in &entry.unused_assets {
                        writeln!(w, "  - {asset}")?;
                    }
                }
            }
            Ok(())
        }
        OutputFormat::Markdown => {
            writeln!(w, "| command | path | unused_count | prune_candidate_count |")?;
            writeln!(w, "|---|---|---:|---:|")?;
            writeln!(
                w,
                "| {} | {} | {} | {} |",
                report.command, report.path, report.unused_count, report.prune_candidate_count
            )?;
            if report.unused.is_empty() {
                return Ok(());
            }
            writeln!(w, "\n| file | asset |")?;
            writeln!(w, "|---|---|")?;
            for (catalog, entry) in &report.unused_by_file {
                for asset in &entry.unused_assets {
                    writeln!(w, "| {catalog} | {asset} |")?;
                }
            }
            Ok(())
        }
    }
}

fn render_prune(
    w: &mut dyn Write,
    output: OutputFormat,
    report: &PruneReport,
) -> Result<(), CliError> {
    match output {
        OutputFormat::Json => write_json(w, report),
        OutputFormat::Table => {
            writeln!(
                w,
                "command  path  apply  force  dry_run  unused_count  prune_candidate_count  deleted_count"
            )?;
            writeln!(
                w,
                "{}  {}  {}  {}  {}  {}  {}  {}",
                report.command,
                report.path,
                report.apply,
                report.force,
                report.dry_run,
                report.unused_count,
                report.prune_candidate_count,
                report.deleted.len()
            )?;
            Ok(())
        }
        OutputFormat::Markdown => {
            writeln!(
                w,
                "| command | path | apply | force | dry_run | unused_count | prune_candidate_count | deleted_count |"
            )?;
            writeln!(w, "|---|---|---|---|---|---:|---:|---:|")?;
            writeln!(
                w,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                report.command,
                report.path,
                report.apply,
                report.force,
                report.dry_run,
                report.unused_count,
                report.prune_candidate_count,
                report.deleted.len()
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_values_parse() {
        assert!(parse_output("json").is_some());
        assert!(parse_output("table").is_some());
        assert!(parse_output("markdown").is_some());
        assert!(parse_output("yaml").is_none());
    }

    #[test]
    fn workers_zero_is_a_usage_error() {
        assert!(matches!(resolve_workers(Some(0)), Err(CliError::Usage(_))));
        assert_eq!(resolve_workers(Some(4)).unwrap(), 4);
    }

    #[test]
    fn tilde_paths_expand_to_home() {
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            assert_eq!(expand_tilde_path("~").unwrap(), home);
            assert_eq!(expand_tilde_path("~/proj").unwrap(), home.join("proj"));
        }
        assert_eq!(expand_tilde_path("/abs").unwrap(), PathBuf::from("/abs"));
    }

    #[test]
    fn invalid_globs_are_usage_errors() {
        let err = validate_glob_patterns(&["a**b".to_string()], "exclude").unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert!(err.to_string().contains("--exclude"));

        // Directory prefixes and valid globs pass.
        validate_glob_patterns(
            &["Pods/".to_string(), "Sources/**/*.swift".to_string()],
            "include",
        )
        .unwrap();
    }

    #[test]
    fn prunable_paths_require_asset_set_extensions() {
        assert!(is_prunable_asset_set_path(Path::new("/p/a.imageset")));
        assert!(is_prunable_asset_set_path(Path::new("/p/a.colorset")));
        assert!(is_prunable_asset_set_path(Path::new("/p/a.dataset")));
        assert!(!is_prunable_asset_set_path(Path::new("/p/Assets.xcassets")));
        assert!(!is_prunable_asset_set_path(Path::new("/p/notes.txt")));
    }

    #[test]
    fn display_names_add_extension_only_on_type_collision() {
        let paths = vec![
            PathBuf::from("/c/logo.imageset"),
            PathBuf::from("/c/logo.colorset"),
            PathBuf::from("/c/plain.imageset"),
        ];
        assert_eq!(
            unused_display_names(&paths),
            vec!["logo.colorset", "logo.imageset", "plain"]
        );
    }

    #[test]
    fn prune_targets_are_unique_and_sorted() {
        let mut grouped = BTreeMap::new();
        grouped.insert(
            PathBuf::from("/a/Assets.xcassets"),
            vec![
                PathBuf::from("/a/Assets.xcassets/z.imageset"),
                PathBuf::from("/a/Assets.xcassets/a.colorset"),
            ],
        );
        grouped.insert(
            PathBuf::from("/b/Assets.xcassets"),
            vec![PathBuf::from("/a/Assets.xcassets/z.imageset")],
        );
        let targets = collect_prune_targets(&grouped);
        assert_eq!(
            targets,
            vec![
                PathBuf::from("/a/Assets.xcassets/a.colorset"),
                PathBuf::from("/a/Assets.xcassets/z.imageset"),
            ]
        );
    }

    #[test]
    fn delete_refuses_non_asset_set_paths() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("precious");
        std::fs::create_dir_all(&victim).unwrap();
        let err = delete_prune_targets(dir.path(), &[victim.clone()]).unwrap_err();
        assert!(err.to_string().contains("refusing to delete"));
        assert!(victim.exists());
    }

    #[test]
    fn delete_allows_catalog_root_as_prune_root() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_root = dir.path().join("Assets.xcassets");
        let target = catalog_root.join("unused.imageset");
        std::fs::create_dir_all(&target).unwrap();
        delete_prune_targets(&catalog_root, &[target.clone()]).unwrap();
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_rejects_symlink_target_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_root = dir.path().join("Assets.xcassets");
        std::fs::create_dir_all(&catalog_root).unwrap();

        let outside_dir = tempfile::tempdir().unwrap();
        let outside = outside_dir.path().join("outside.imageset");
        std::fs::create_dir_all(&outside).unwrap();

        let link = catalog_root.join("linked.imageset");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let err = delete_prune_targets(dir.path(), &[link.clone()]).unwrap_err();
        assert!(err.to_string().contains("outside root"));
        // The rejected symlink stays in place.
        assert!(std::fs::symlink_metadata(&link).is_ok());
        assert!(outside.exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_allows_symlinked_catalog_root() {
        let dir = tempfile::tempdir().unwrap();
        let real_root = dir.path().join("real-catalog-root");
        std::fs::create_dir_all(&real_root).unwrap();
        let linked_root = dir.path().join("LinkedAssets.xcassets");
        std::os::unix::fs::symlink(&real_root, &linked_root).unwrap();

        let target = linked_root.join("unused.imageset");
        std::fs::create_dir_all(&target).unwrap();
        delete_prune_targets(&linked_root, &[target.clone()]).unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn flattened_names_deduplicate_across_groups() {
        let mut grouped = BTreeMap::new();
        grouped.insert(
            "/a".to_string(),
            UnusedFileEntry {
                unused_assets: vec!["icon".to_string()],
            },
        );
        grouped.insert(
            "/b".to_string(),
            UnusedFileEntry {
                unused_assets: vec!["icon".to_string(), "badge".to_string()],
            },
        );
        assert_eq!(flatten_unused_names(&grouped), vec!["badge", "icon"]);
    }
}
