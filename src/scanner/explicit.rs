//! Explicitly typed asset references in Swift and Objective-C sources.
//!
//! Every matcher here carries an asset type, so `UIImage(named: "logo")`
//! marks `logo.imageset` used while a sibling `logo.colorset` stays unused.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::labels::LabelAssetTypes;
use super::models::{AssetType, SourceReference};

static NAMED_IMAGE_RE: OnceLock<Regex> = OnceLock::new();
static NAMED_COLOR_RE: OnceLock<Regex> = OnceLock::new();
static NAMED_DATA_RE: OnceLock<Regex> = OnceLock::new();
static SWIFTUI_IMAGE_RE: OnceLock<Regex> = OnceLock::new();
static SWIFTUI_COLOR_RE: OnceLock<Regex> = OnceLock::new();
static OBJC_IMAGE_NAMED_RE: OnceLock<Regex> = OnceLock::new();
static OBJC_IMAGE_NAMED_VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
static OBJC_COLOR_NAMED_RE: OnceLock<Regex> = OnceLock::new();
static OBJC_DATA_ASSET_RE: OnceLock<Regex> = OnceLock::new();
static OBJC_STRING_LITERAL_RE: OnceLock<Regex> = OnceLock::new();

fn named_image_re() -> &'static Regex {
    NAMED_IMAGE_RE.get_or_init(|| {
        Regex::new(r#"\b(?:UI|NS)?Image\s*\(\s*(?:named|name)\s*:\s*"([A-Za-z0-9._ -]+)""#).unwrap()
    })
}

fn named_color_re() -> &'static Regex {
    NAMED_COLOR_RE.get_or_init(|| {
        Regex::new(r#"\b(?:UI|NS)?Color\s*\(\s*(?:named|name)\s*:\s*"([A-Za-z0-9._ -]+)""#).unwrap()
    })
}

fn named_data_re() -> &'static Regex {
    NAMED_DATA_RE.get_or_init(|| {
        Regex::new(r#"\b(?:NS)?DataAsset\s*\(\s*(?:named|name)\s*:\s*"([A-Za-z0-9._ -]+)""#)
            .unwrap()
    })
}

/// SwiftUI `Image("name")`, tolerating trailing arguments such as
/// `Image("name", bundle: .main)`.
fn swiftui_image_re() -> &'static Regex {
    SWIFTUI_IMAGE_RE.get_or_init(|| {
        Regex::new(r#"\bImage\s*\(\s*"([A-Za-z0-9._ -]+)"(?:\s*,[^)]*)?\)"#).unwrap()
    })
}

fn swiftui_color_re() -> &'static Regex {
    SWIFTUI_COLOR_RE.get_or_init(|| {
        Regex::new(r#"\bColor\s*\(\s*"([A-Za-z0-9._ -]+)"(?:\s*,[^)]*)?\)"#).unwrap()
    })
}

fn objc_image_named_re() -> &'static Regex {
    OBJC_IMAGE_NAMED_RE.get_or_init(|| {
        Regex::new(r#"\b(?:UI|NS)Image\s+imageNamed:\s*@"([A-Za-z0-9._ -]+)""#).unwrap()
    })
}

fn objc_image_named_variable_re() -> &'static Regex {
    OBJC_IMAGE_NAMED_VARIABLE_RE.get_or_init(|| {
        Regex::new(r"\b(?:UI|NS)Image\s+imageNamed:\s*([A-Za-z_][A-Za-z0-9_]*)").unwrap()
    })
}

fn objc_color_named_re() -> &'static Regex {
    OBJC_COLOR_NAMED_RE.get_or_init(|| {
        Regex::new(r#"\b(?:UI|NS)Color\s+colorNamed:\s*@"([A-Za-z0-9._ -]+)""#).unwrap()
    })
}

fn objc_data_asset_re() -> &'static Regex {
    OBJC_DATA_ASSET_RE.get_or_init(|| {
        Regex::new(r#"\b(?:NS)?DataAsset\b[^\n\r;]*\binitWithName:\s*@"([A-Za-z0-9._ -]+)""#)
            .unwrap()
    })
}

fn objc_string_literal_re() -> &'static Regex {
    OBJC_STRING_LITERAL_RE.get_or_init(|| Regex::new(r#"@"([A-Za-z0-9._ -]+)""#).unwrap())
}

/// Collector that deduplicates by `(asset_type, name)` across all matchers.
#[derive(Default)]
struct ExplicitRefs {
    seen: HashSet<(AssetType, String)>,
    out: Vec<SourceReference>,
}

impl ExplicitRefs {
    fn capture_all(&mut self, content: &str, re: &Regex, asset_type: AssetType) {
        for cap in re.captures_iter(content) {
            self.push(cap[1].trim().to_string(), asset_type);
        }
    }

    fn push(&mut self, name: String, asset_type: AssetType) {
        if name.is_empty() || !self.seen.insert((asset_type, name.clone())) {
            return;
        }
        self.out.push(SourceReference {
            name,
            asset_type: Some(asset_type),
        });
    }
}

/// Extract every explicitly typed reference from one source file.
///
/// `labels` comes from the whole-tree prepass; a call site like
/// `icon: .hero` only counts when some Swift file declares `icon` as an
/// asset resource parameter.
pub fn extract_explicit_references(content: &str, labels: &LabelAssetTypes) -> Vec<SourceReference> {
    let mut refs = ExplicitRefs::default();
    refs.capture_all(content, named_image_re(), AssetType::Image);
    refs.capture_all(content, named_color_re(), AssetType::Color);
    refs.capture_all(content, named_data_re(), AssetType::Data);
    refs.capture_all(content, swiftui_image_re(), AssetType::Image);
    refs.capture_all(content, swiftui_color_re(), AssetType::Color);
    for (name, asset_type) in labeled_argument_references(content, labels) {
        refs.push(name, asset_type);
    }
    refs.capture_all(content, objc_image_named_re(), AssetType::Image);
    refs.capture_all(content, objc_color_named_re(), AssetType::Color);
    refs.capture_all(content, objc_data_asset_re(), AssetType::Data);
    for name in objc_image_named_variable_references(content) {
        refs.push(name, AssetType::Image);
    }
    refs.out
}

/// Call sites `label: .member` for every known resource-typed label.
fn labeled_argument_references(content: &str, labels: &LabelAssetTypes) -> Vec<(String, AssetType)> {
    let mut out = Vec::new();
    for (label, asset_types) in labels {
        let re = Regex::new(&format!(
            r"\b{}\s*:\s*\.([A-Za-z_][A-Za-z0-9_]*)",
            regex::escape(label)
        ))
        .unwrap();
        for cap in re.captures_iter(content) {
            let name = cap[1].trim();
            if name.is_empty() {
                continue;
            }
            for asset_type in asset_types {
                out.push((name.to_string(), *asset_type));
            }
        }
    }
    out
}

/// `[UIImage imageNamed:someVariable]` where the variable is assigned a
/// string literal elsewhere in the same file.
fn objc_image_named_variable_references(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for cap in objc_image_named_variable_re().captures_iter(content) {
        let variable = cap[1].trim();
        if variable.is_empty() {
            continue;
        }
        let assign_re = Regex::new(&format!(
            r"\b{}\s*=\s*([^;]+);",
            regex::escape(variable)
        ))
        .unwrap();
        for assignment in assign_re.captures_iter(content) {
            for literal in objc_string_literal_re().captures_iter(&assignment[1]) {
                let name = literal[1].trim().to_string();
                if name.is_empty() || !seen.insert(name.clone()) {
                    continue;
                }
                names.push(name);
            }
        }
    }
    names
}
