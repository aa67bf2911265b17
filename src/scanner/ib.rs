//! Interface Builder reference matchers for `.xib` and `.storyboard` files.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// `image=`, `selectedImage=`, `highlightedImage=` attribute values.
static IMAGE_STATE_RE: OnceLock<Regex> = OnceLock::new();

/// `<image ... name="..."/>` and `<color ... name="..."/>` tags.
static NAMED_TAG_RE: OnceLock<Regex> = OnceLock::new();

fn image_state_re() -> &'static Regex {
    IMAGE_STATE_RE.get_or_init(|| {
        Regex::new(r#"\b(?:image|selectedImage|highlightedImage)\s*=\s*"([A-Za-z0-9._ -]+)""#)
            .unwrap()
    })
}

fn named_tag_re() -> &'static Regex {
    NAMED_TAG_RE
        .get_or_init(|| Regex::new(r#"<(?:image|color)\b[^>]*\bname\s*=\s*"([A-Za-z0-9._ -]+)""#).unwrap())
}

/// Extract asset names referenced from Interface Builder XML.
///
/// Only the image state attributes and named `<image>`/`<color>` tags count.
/// A generic `name="..."` on any other element (`<capability name=.../>`,
/// device configurations, fonts) is not an asset reference.
pub fn extract_ib_references(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for re in [image_state_re(), named_tag_re()] {
        for cap in re.captures_iter(content) {
            let name = cap[1].trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }
            out.push(name.to_string());
        }
    }
    out
}
