//! End-to-end scan scenarios over real directory trees.

mod common;
use common::{asset_dirs, project, scan_with_workers};

use std::path::PathBuf;

use assetsweep::{scan, Options};

#[test]
fn basic_used_and_unused_partition() {
    let (_dir, root) = project(&[("App/View.swift", r#"let i = UIImage(named: "icon")"#)]);
    asset_dirs(
        &root,
        &[
            "App/Assets.xcassets/icon.imageset",
            "App/Assets.xcassets/unused.colorset",
        ],
    );

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.asset_catalogs, 1);
    assert_eq!(result.asset_names, vec!["icon", "unused"]);
    assert_eq!(result.used_assets, vec!["icon"]);
    assert_eq!(result.unused_assets, vec!["unused"]);

    let catalog = root.join("App/Assets.xcassets");
    let grouped = &result.unused_by_catalog[&catalog];
    assert_eq!(grouped, &vec![catalog.join("unused.colorset")]);
}

#[test]
fn typed_reference_disambiguates_same_name_assets() {
    let (_dir, root) = project(&[("App/Feature.swift", r#"let _ = UIImage(named: "logo")"#)]);
    asset_dirs(
        &root,
        &[
            "App/Assets.xcassets/logo.imageset",
            "App/Assets.xcassets/logo.colorset",
        ],
    );

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.asset_names, vec!["logo.colorset", "logo.imageset"]);
    assert_eq!(result.used_assets, vec!["logo.imageset"]);
    assert_eq!(result.unused_assets, vec!["logo.colorset"]);

    let catalog = root.join("App/Assets.xcassets");
    assert_eq!(
        result.unused_by_catalog[&catalog],
        vec![catalog.join("logo.colorset")]
    );
}

#[test]
fn locality_tie_break_prefers_the_referencing_module() {
    let (_dir, root) = project(&[(
        "Modules/ModuleA/Feature.swift",
        r#"let _ = UIImage(named: "icon")"#,
    )]);
    asset_dirs(
        &root,
        &[
            "Modules/ModuleA/Assets.xcassets/icon.imageset",
            "Modules/ModuleB/Assets.xcassets/icon.imageset",
        ],
    );

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["icon"]);
    assert!(result.unused_assets.is_empty());

    let module_a = root.join("Modules/ModuleA/Assets.xcassets");
    let module_b = root.join("Modules/ModuleB/Assets.xcassets");
    assert!(!result.unused_by_catalog.contains_key(&module_a));
    let grouped = &result.unused_by_catalog[&module_b];
    assert_eq!(grouped, &vec![module_b.join("icon.imageset")]);
}

#[test]
fn resource_identifier_with_image_suffix_trim() {
    let (_dir, root) = project(&[(
        "App/View.swift",
        "let image = UIImage(resource: .something)",
    )]);
    asset_dirs(&root, &["App/Assets.xcassets/somethingImage.imageset"]);

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["somethingImage"]);
    assert!(result.unused_assets.is_empty());
}

#[test]
fn lowercase_image_suffix_is_not_trimmed() {
    let (_dir, root) = project(&[(
        "App/View.swift",
        "let image = UIImage(resource: .somethingimage)",
    )]);
    asset_dirs(&root, &["App/Assets.xcassets/somethingimage.imageset"]);

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["somethingimage"]);

    // The trimmed spelling does not reach the lowercase-suffixed asset.
    let (_dir2, root2) = project(&[(
        "App/View.swift",
        "let image = UIImage(resource: .something)",
    )]);
    asset_dirs(&root2, &["App/Assets.xcassets/somethingimage.imageset"]);
    let result2 = scan_with_workers(&root2, 2);
    assert_eq!(result2.unused_assets, vec!["somethingimage"]);
}

#[test]
fn leading_digit_asset_resolves_through_underscore_variant() {
    let (_dir, root) = project(&[(
        "App/Payments.swift",
        "let icon = UIImage(resource: ._2CheckoutPaymentIcon)",
    )]);
    asset_dirs(&root, &["App/Assets.xcassets/2checkoutPaymentIcon.imageset"]);

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["2checkoutPaymentIcon"]);
    assert!(result.unused_assets.is_empty());
}

#[test]
fn labeled_argument_needs_a_declaration_prepass() {
    // Declaration in file A gates the call site in file B.
    let (_dir, root) = project(&[
        (
            "Modules/UI/FieldView.swift",
            "func setData(icon: ImageResource, fieldName: String, value: String) {}",
        ),
        (
            "App/Screen.swift",
            r#"view.setData(icon: .foo, fieldName: "x", value: "y")"#,
        ),
    ]);
    asset_dirs(&root, &["App/Assets.xcassets/foo.imageset"]);
    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["foo"]);

    // Without any ImageResource declaration the same call marks nothing.
    let (_dir2, root2) = project(&[(
        "App/Screen.swift",
        r#"view.setData(icon: .foo, fieldName: "x", value: "y")"#,
    )]);
    asset_dirs(&root2, &["App/Assets.xcassets/foo.imageset"]);
    let result2 = scan_with_workers(&root2, 2);
    assert!(result2.used_assets.is_empty());
    assert_eq!(result2.unused_assets, vec!["foo"]);
}

#[test]
fn camel_cased_identifier_reaches_dashed_asset_name() {
    let (_dir, root) = project(&[(
        "App/View.swift",
        "let image = UIImage(resource: .navBarIcon)",
    )]);
    asset_dirs(&root, &["App/Assets.xcassets/nav-bar_icon.imageset"]);

    let result = scan_with_workers(&root, 2);
    assert_eq!(result.used_assets, vec!["nav-bar_icon"]);
}

#[test]
fn comments_and_unrelated_strings_do_not_mark_assets_used() {
    let (_dir, root) = project(&[(
        "App/Noise.swift",
        r#"// orphanIcon appears as an unrelated token and string
let value = "orphanIcon"
let orphanIcon = "debug-only"
"#,
    )]);
    asset_dirs(&root, &["App/Assets.xcassets/orphanIcon.imageset"]);

    let result = scan_with_workers(&root, 2);
    assert!(result.used_assets.is_empty());
    assert_eq!(result.unused_assets, vec!["orphanIcon"]);
}

#[test]
fn duplicate_names_across_catalogs_share_one_summary_vocabulary() {
    let (_dir, root) = project(&[(
        "Modules/ModuleA/Feature.swift",
        r#"let _ = UIImage(named: "icon")"#,
    )]);
    asset_dirs(
        &root,
        &[
            "Modules/ModuleA/Assets.xcassets/icon.imageset",
            "Modules/ModuleB/Assets.xcassets/icon.imageset",
        ],
    );

    let result = scan_with_workers(&root, 2);
    // "icon" is used (in ModuleA) so it never also appears unused, but the
    // stale ModuleB copy stays in the grouped listing.
    assert_eq!(result.used_assets, vec!["icon"]);
    assert!(result.unused_assets.is_empty());
    assert_eq!(result.unused_by_catalog.len(), 1);
}

#[test]
fn used_and_unused_partition_the_summary_vocabulary() {
    let (_dir, root) = project(&[(
        "App/View.swift",
        r#"let a = UIImage(named: "kept")
let b = UIColor(named: "tint")"#,
    )]);
    asset_dirs(
        &root,
        &[
            "App/Assets.xcassets/kept.imageset",
            "App/Assets.xcassets/tint.colorset",
            "App/Assets.xcassets/stale.imageset",
            "App/Assets.xcassets/old.dataset",
        ],
    );

    let result = scan_with_workers(&root, 4);
    let mut reunion: Vec<String> = result
        .used_assets
        .iter()
        .chain(result.unused_assets.iter())
        .cloned()
        .collect();
    reunion.sort();
    assert_eq!(reunion, result.asset_names);
    for name in &result.used_assets {
        assert!(!result.unused_assets.contains(name));
    }
}

#[test]
fn invalid_utf8_source_fails_the_scan_and_names_the_file() {
    let (_dir, root) = project(&[("App/Ok.swift", "let a = 1")]);
    asset_dirs(&root, &["App/Assets.xcassets/icon.imageset"]);
    std::fs::write(root.join("App/Bad.swift"), [0xff, 0xfe, 0xfd]).unwrap();

    let err = scan(&Options {
        root: root.clone(),
        include: Vec::new(),
        exclude: Vec::new(),
        workers: 2,
    })
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("invalid UTF-8 encoding"));
    assert!(message.contains("Bad.swift"));
}

#[test]
fn read_error_does_not_deadlock_the_worker_pool() {
    // Many files queued behind a failing one. The broken file is an .m so
    // the error surfaces inside a worker, not in the Swift label prepass;
    // the scan must still terminate and report it.
    let mut files: Vec<(String, String)> = Vec::new();
    for i in 0..64 {
        files.push((format!("App/File{i}.m"), format!("int value{i} = {i};")));
    }
    let file_refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let (_dir, root) = project(&file_refs);
    asset_dirs(&root, &["App/Assets.xcassets/icon.imageset"]);
    std::fs::write(root.join("App/000_Broken.m"), [0x80, 0x81]).unwrap();

    let err = scan(&Options {
        root,
        include: Vec::new(),
        exclude: Vec::new(),
        workers: 1,
    })
    .unwrap_err();
    assert!(err.to_string().contains("000_Broken.m"));
}

#[test]
fn missing_root_is_a_walk_error() {
    let err = scan(&Options {
        root: PathBuf::from("/nonexistent/assetsweep-test-root"),
        include: Vec::new(),
        exclude: Vec::new(),
        workers: 1,
    })
    .unwrap_err();
    assert!(matches!(err, assetsweep::ScanError::Walk { .. }));
}
