//! Matchers for Xcode-generated Swift resource identifiers and the
//! candidate index that resolves them back to asset sets.
//!
//! Xcode derives `ImageResource`/`ColorResource` members from asset names
//! with a handful of renaming conventions (camel-casing across punctuation,
//! capital-suffix trimming, leading-digit underscoring). Resolution works
//! backwards: every asset pre-computes the identifiers that could legally
//! denote it, and matched identifiers are looked up in that index.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::models::{AssetType, DiscoveredAsset};

/// `UIImage(resource: .ident)` and the NS-/plain-prefixed variants.
static RESOURCE_REF_RE: OnceLock<Regex> = OnceLock::new();

/// `var x: ImageResource`, `var x: [ColorResource]` annotations.
static TYPED_VAR_RE: OnceLock<Regex> = OnceLock::new();

/// `var x = [ImageResource]()` inferred-array initialisers.
static TYPED_VAR_INIT_RE: OnceLock<Regex> = OnceLock::new();

/// `var x: ImageResource?` scalar annotations, optional or force-unwrapped.
static TYPED_SCALAR_VAR_RE: OnceLock<Regex> = OnceLock::new();

/// Function or computed-property heads whose value is a resource type.
static RESOURCE_RETURN_TYPE_RE: OnceLock<Regex> = OnceLock::new();

/// `return .ident` inside a resource-typed body.
static RETURN_ENUM_MEMBER_RE: OnceLock<Regex> = OnceLock::new();

/// Bare `.ident` enum members inside an array literal.
static ENUM_MEMBER_RE: OnceLock<Regex> = OnceLock::new();

fn resource_ref_re() -> &'static Regex {
    RESOURCE_REF_RE.get_or_init(|| {
        Regex::new(
            r"\b(?:(?:UI|NS)?(?:Image|Color)|(?:NS)?DataAsset)\s*\(\s*resource\s*:\s*\.([A-Za-z_][A-Za-z0-9_]*)",
        )
        .unwrap()
    })
}

fn typed_var_re() -> &'static Regex {
    TYPED_VAR_RE.get_or_init(|| {
        Regex::new(
            r"\b(?:var|let)\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?:\[[ \t]*)?(?:ImageResource|ColorResource)(?:[ \t]*\])?",
        )
        .unwrap()
    })
}

fn typed_var_init_re() -> &'static Regex {
    TYPED_VAR_INIT_RE.get_or_init(|| {
        Regex::new(
            r"\b(?:var|let)\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*\[\s*(?:ImageResource|ColorResource)\s*\]\s*\(\s*\)",
        )
        .unwrap()
    })
}

fn typed_scalar_var_re() -> &'static Regex {
    TYPED_SCALAR_VAR_RE.get_or_init(|| {
        Regex::new(
            r"\b(?:var|let)\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?:ImageResource|ColorResource)\s*[!?]?",
        )
        .unwrap()
    })
}

fn resource_return_type_re() -> &'static Regex {
    RESOURCE_RETURN_TYPE_RE.get_or_init(|| {
        Regex::new(
            r"(?:func|var)\s+[A-Za-z_][A-Za-z0-9_]*[^{\n\r]*->\s*(?:ImageResource|ColorResource)|\bvar\s+[A-Za-z_][A-Za-z0-9_]*\s*:\s*(?:ImageResource|ColorResource)\s*\{",
        )
        .unwrap()
    })
}

fn return_enum_member_re() -> &'static Regex {
    RETURN_ENUM_MEMBER_RE
        .get_or_init(|| Regex::new(r"\breturn\s+\.([A-Za-z_][A-Za-z0-9_]*)").unwrap())
}

fn enum_member_re() -> &'static Regex {
    ENUM_MEMBER_RE.get_or_init(|| Regex::new(r"\.\s*([A-Za-z_][A-Za-z0-9_]*)").unwrap())
}

fn push_unique(seen: &mut HashSet<String>, out: &mut Vec<String>, identifier: &str) {
    if identifier.is_empty() || !seen.insert(identifier.to_string()) {
        return;
    }
    out.push(identifier.to_string());
}

/// Identifiers from the direct form `UIImage(resource: .ident)`.
pub fn extract_resource_identifiers(content: &str) -> Vec<String> {
    resource_ref_re()
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .filter(|ident| !ident.is_empty())
        .collect()
}

/// Identifiers reachable through resource-typed variables and returns:
/// array/scalar assignments, `.append`/`.insert` calls, and `return .ident`
/// inside brace-balanced bodies whose declared value type is a resource.
pub fn extract_typed_resource_identifiers(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for re in [typed_var_re(), typed_var_init_re(), typed_scalar_var_re()] {
        for cap in re.captures_iter(content) {
            let name = cap[1].trim();
            if !name.is_empty() {
                variables.push(name.to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();
    for variable in &variables {
        for identifier in enum_identifiers_for_variable(content, variable) {
            push_unique(&mut seen, &mut identifiers, &identifier);
        }
    }
    for body in resource_return_bodies(content) {
        for cap in return_enum_member_re().captures_iter(body) {
            push_unique(&mut seen, &mut identifiers, cap[1].trim());
        }
    }
    identifiers
}

/// Enum members flowing into one variable: `x = [.a, .b]`, `x.append(.c)`,
/// `x.insert(.d)`, and scalar `x = .e`.
fn enum_identifiers_for_variable(content: &str, variable: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let escaped = regex::escape(variable);

    let array_assign_re =
        Regex::new(&format!(r"\b{escaped}(?:\s*:\s*[^=\n\r]+)?\s*=\s*\[([^\]]*)\]")).unwrap();
    for cap in array_assign_re.captures_iter(content) {
        for member in enum_member_re().captures_iter(&cap[1]) {
            push_unique(&mut seen, &mut out, member[1].trim());
        }
    }

    for pattern in [
        format!(r"\b{escaped}\s*\.append\s*\(\s*\.([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"\b{escaped}\s*\.insert\s*\(\s*\.([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"\b{escaped}(?:\s*:\s*[^=\n\r]+)?\s*=\s*\.([A-Za-z_][A-Za-z0-9_]*)"),
    ] {
        let re = Regex::new(&pattern).unwrap();
        for cap in re.captures_iter(content) {
            push_unique(&mut seen, &mut out, cap[1].trim());
        }
    }
    out
}

/// Bodies of functions and computed properties whose value type is a
/// resource. Scope is strict: members in bodies with other return types
/// never leak into the result.
fn resource_return_bodies(content: &str) -> Vec<&str> {
    let mut bodies = Vec::new();
    for head in resource_return_type_re().find_iter(content) {
        let Some(open_offset) = content[head.start()..].find('{') else {
            continue;
        };
        let open = head.start() + open_offset;
        let Some(close) = matching_brace(content, open) else {
            continue;
        };
        bodies.push(&content[open + 1..close]);
    }
    bodies
}

/// Byte index of the brace closing the one opened at `open`.
fn matching_brace(content: &str, open: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// All Swift identifiers that could denote an asset via `.x` syntax: the
/// raw name, its camelized form, the capital-suffix trim for the asset's
/// own type, and the leading-digit variant of each.
pub fn resource_candidates(name: &str, asset_type: AssetType) -> Vec<String> {
    let mut base = vec![name.to_string()];
    let camel = camelize(name);
    if !camel.is_empty() && camel != name {
        base.push(camel);
    }
    // Xcode drops a trailing capitalized type word: "somethingImage.imageset"
    // is reachable as `.something`. Lowercase suffixes are never trimmed.
    let suffix = match asset_type {
        AssetType::Image => "Image",
        AssetType::Color => "Color",
        AssetType::Data => "Data",
    };
    if let Some(stripped) = name.strip_suffix(suffix) {
        if !stripped.is_empty() {
            base.push(stripped.to_string());
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for candidate in &base {
        push_unique(&mut seen, &mut out, candidate);
        if let Some(variant) = leading_digit_variant(candidate) {
            push_unique(&mut seen, &mut out, &variant);
        }
    }
    out
}

/// Split on any rune that is not a letter or digit, then join lower-camel.
/// Case mapping is per character, so multi-byte letters survive:
/// `primary_äpfel` becomes `primaryÄpfel`.
fn camelize(name: &str) -> String {
    let mut parts = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty());
    let Some(first) = parts.next() else {
        return String::new();
    };
    let mut camel = first.to_lowercase();
    for part in parts {
        let mut chars = part.chars();
        if let Some(head) = chars.next() {
            camel.extend(head.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

/// Identifiers generated for leading-digit names start with `_` and
/// uppercase the first letter after the digits: `2checkout` -> `_2Checkout`.
fn leading_digit_variant(name: &str) -> Option<String> {
    if !name.chars().next()?.is_ascii_digit() {
        return None;
    }
    let mut out = String::with_capacity(name.len() + 1);
    out.push('_');
    let mut chars = name.chars().peekable();
    while let Some(&c) = chars.peek() {
        if !c.is_numeric() {
            break;
        }
        out.push(c);
        chars.next();
    }
    if let Some(c) = chars.next() {
        if c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        out.extend(chars);
    }
    Some(out)
}

/// Maps candidate identifiers to the assets they may denote. Multiple
/// assets can share a key; locality tie-breaking picks between them.
pub struct CandidateIndex<'a> {
    by_identifier: HashMap<String, Vec<&'a DiscoveredAsset>>,
}

impl<'a> CandidateIndex<'a> {
    pub fn build(assets: &'a [DiscoveredAsset]) -> Self {
        let mut by_identifier: HashMap<String, Vec<&'a DiscoveredAsset>> = HashMap::new();
        for asset in assets {
            for candidate in resource_candidates(&asset.name, asset.asset_type) {
                let entry = by_identifier.entry(candidate).or_default();
                if !entry.iter().any(|known| known.asset_path == asset.asset_path) {
                    entry.push(asset);
                }
            }
        }
        CandidateIndex { by_identifier }
    }

    pub fn get(&self, identifier: &str) -> Option<&[&'a DiscoveredAsset]> {
        self.by_identifier.get(identifier).map(Vec::as_slice)
    }
}
