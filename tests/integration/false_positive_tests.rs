//! False positive regression tests
//!
//! Each test pins down a project shape where an item is in use even though
//! a naive scan might report it as unused.

use fluttertidy::analysis::{AnalysisResult, Analyzer};
use fluttertidy::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("app");
    for (rel, contents) in files {
        write(&root, rel, contents);
    }
    (temp, root)
}

fn analyze(root: &Path, config: Config) -> AnalysisResult {
    Analyzer::new(root, config).run().expect("analysis should succeed")
}

fn unused_items(result: &AnalysisResult) -> Vec<String> {
    result.findings().into_iter().map(|f| f.item).collect()
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_import_with_prefix_and_combinators() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        (
            "lib/main.dart",
            r#"
import 'src/a.dart' as a;
import "src/b.dart" show B;
import 'src/c.dart' hide C
    show D;
import 'src/d.dart' deferred as d;
"#,
        ),
        ("lib/src/a.dart", ""),
        ("lib/src/b.dart", ""),
        ("lib/src/c.dart", ""),
        ("lib/src/d.dart", ""),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty(), "{:?}", unused_items(&result));
}

#[test]
fn test_relative_imports_with_parent_segments() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        ("lib/main.dart", "import 'features/cart/view.dart';\n"),
        ("lib/features/cart/view.dart", "import '../../shared/theme.dart';\n"),
        ("lib/shared/theme.dart", ""),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_own_package_import_with_configured_name() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: storefront\n"),
        ("lib/main.dart", "import 'package:storefront/ui/home.dart';\n"),
        ("lib/ui/home.dart", ""),
    ]);

    let config = Config {
        package_name: Some("storefront".to_string()),
        ..Config::default()
    };
    let result = analyze(&root, config);
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_other_package_import_does_not_mark_local_file() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        ("lib/main.dart", "import 'package:other/widgets.dart';\n"),
        ("lib/widgets.dart", ""),
    ]);

    let result = analyze(&root, Config::default());
    assert_eq!(unused_items(&result), vec!["lib/widgets.dart"]);
}

#[test]
fn test_configured_entry_point() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        ("lib/main.dart", ""),
        ("lib/background/worker.dart", "import 'jobs.dart';\n"),
        ("lib/background/jobs.dart", ""),
    ]);

    let default_run = analyze(&root, Config::default());
    assert_eq!(unused_items(&default_run), vec!["lib/background/worker.dart"]);

    let config = Config {
        entry_points: vec![PathBuf::from("lib/background/worker.dart")],
        ..Config::default()
    };
    let result = analyze(&root, config);
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_generated_part_files() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        ("lib/main.dart", "import 'models/user.dart';\n"),
        (
            "lib/models/user.dart",
            "part 'user.g.dart';\npart 'user.freezed.dart';\nclass User {}\n",
        ),
        ("lib/models/user.g.dart", "part of 'user.dart';\n"),
        ("lib/models/user.freezed.dart", "part of 'user.dart';\n"),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_import_in_comment_still_counts() {
    // Comments are not stripped before matching
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\n"),
        ("lib/main.dart", "// import 'legacy.dart';\n"),
        ("lib/legacy.dart", ""),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}

// ============================================================================
// Assets
// ============================================================================

const ASSET_PUBSPEC: &str = r#"
name: app
flutter:
  assets:
    - assets/
    - path: assets/fonts/brand.ttf
"#;

#[test]
fn test_asset_literal_in_double_quotes() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", ASSET_PUBSPEC),
        ("assets/splash.png", ""),
        ("assets/fonts/brand.ttf", ""),
        (
            "lib/main.dart",
            "final s = \"assets/splash.png\";\nconst font = 'assets/fonts/brand.ttf';\n",
        ),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty(), "{:?}", unused_items(&result));
}

#[test]
fn test_alias_with_explicit_type() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", ASSET_PUBSPEC),
        ("assets/splash.png", ""),
        ("assets/fonts/brand.ttf", ""),
        (
            "lib/res.dart",
            r#"
class Images {
  static const String splash = "assets/splash.png";
  static const brand = 'assets/fonts/brand.ttf';
}
"#,
        ),
        (
            "lib/main.dart",
            "import 'res.dart';\nfinal a = Images.splash;\nfinal b = Images.brand;\n",
        ),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty(), "{:?}", unused_items(&result));
}

#[test]
fn test_alias_key_is_matched_by_containment() {
    // `Images.splashDark` contains `Images.splash`; the asset stays used
    let (_temp, root) = project(&[
        ("pubspec.yaml", ASSET_PUBSPEC),
        ("assets/splash.png", ""),
        ("assets/fonts/brand.ttf", ""),
        (
            "lib/res.dart",
            "class Images { static const splash = 'assets/splash.png'; }\n",
        ),
        ("lib/main.dart", "final a = Images.splashDark;\n"),
    ]);

    let result = analyze(&root, Config::default());
    let assets = result.assets.as_ref().unwrap();
    assert!(assets.is_used(&"assets/splash.png".to_string()));
}

#[test]
fn test_retained_asset_glob() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", ASSET_PUBSPEC),
        ("assets/splash.png", ""),
        ("assets/fonts/brand.ttf", ""),
        ("lib/main.dart", ""),
    ]);

    let config = Config {
        retain: vec!["assets/fonts/*".to_string()],
        ..Config::default()
    };
    let result = analyze(&root, config);
    assert_eq!(unused_items(&result), vec!["assets/splash.png"]);
}

// ============================================================================
// Dependencies
// ============================================================================

#[test]
fn test_federated_plugin_split_import() {
    let (_temp, root) = project(&[
        (
            "pubspec.yaml",
            "name: app\ndependencies:\n  url_launcher_web: any\n  google_maps_flutter_android: any\n",
        ),
        (
            "lib/main.dart",
            "import 'package:url_launcher/web.dart';\nimport 'package:google_maps_flutter/android.dart';\n",
        ),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty(), "{:?}", unused_items(&result));
}

#[test]
fn test_dependency_used_only_through_export() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\ndependencies:\n  equatable: any\n"),
        ("lib/main.dart", "export 'package:equatable/equatable.dart';\n"),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_dependency_name_prefix_is_not_a_match() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\ndependencies:\n  http: any\n"),
        ("lib/main.dart", "import 'package:http_parser/http_parser.dart';\n"),
    ]);

    let result = analyze(&root, Config::default());
    assert_eq!(unused_items(&result), vec!["http"]);
}

#[test]
fn test_sdk_packages_never_reported() {
    let (_temp, root) = project(&[
        (
            "pubspec.yaml",
            r#"
name: app
dependencies:
  flutter:
    sdk: flutter
  flutter_localizations:
    sdk: flutter
dev_dependencies:
  flutter_test:
    sdk: flutter
  flutter_lints: ^3.0.0
"#,
        ),
        ("lib/main.dart", ""),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}

#[test]
fn test_dev_dependency_used_by_script_outside_lib() {
    let (_temp, root) = project(&[
        ("pubspec.yaml", "name: app\ndev_dependencies:\n  args: any\n"),
        ("lib/main.dart", ""),
        ("scripts/release.dart", "import 'package:args/args.dart';\n"),
    ]);

    let result = analyze(&root, Config::default());
    assert!(unused_items(&result).is_empty());
}
