//! Integration tests for the fluttertidy analysis pipeline
//!
//! Each test builds a small Flutter project in a temporary directory and
//! runs the full analyzer over it.

use fluttertidy::analysis::{AnalysisResult, Analyzer, Domain, UsageReport};
use fluttertidy::config::Config;
use fluttertidy::diagnostics::AnalysisWarning;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway Flutter project
struct Project {
    _temp: TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        Self::named("sample_app")
    }

    fn named(name: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path().join(name);
        fs::create_dir_all(&root).expect("Failed to create project dir");
        Self { _temp: temp, root }
    }

    fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn pubspec(&self, contents: &str) -> &Self {
        self.write("pubspec.yaml", contents)
    }

    fn analyze(&self) -> AnalysisResult {
        self.analyze_with(Config::default())
    }

    fn analyze_with(&self, config: Config) -> AnalysisResult {
        Analyzer::new(&self.root, config)
            .run()
            .expect("Analysis should succeed")
    }

    fn rel(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn unused_files(&self, result: &AnalysisResult) -> Vec<String> {
        result
            .files
            .as_ref()
            .unwrap()
            .usage
            .unused
            .iter()
            .map(|p| self.rel(p))
            .collect()
    }
}

fn assert_partition<T: Ord + Clone + std::fmt::Debug>(report: &UsageReport<T>) {
    let declared: BTreeSet<T> = report.declared.iter().cloned().collect();
    let unused: BTreeSet<T> = report.unused.iter().cloned().collect();

    let union: BTreeSet<T> = report.used.union(&unused).cloned().collect();
    assert_eq!(union, declared, "used ∪ unused must equal declared");
    assert!(
        report.used.intersection(&unused).next().is_none(),
        "used and unused must be disjoint"
    );
}

fn assert_all_partitions(result: &AnalysisResult) {
    if let Some(assets) = &result.assets {
        assert_partition(assets);
    }
    if let Some(files) = &result.files {
        assert_partition(&files.usage);
    }
    if let Some(dependencies) = &result.dependencies {
        assert_partition(&dependencies.generic);
        assert_partition(&dependencies.dev);
    }
}

const ASSET_PUBSPEC: &str = r#"
name: sample_app
flutter:
  assets:
    - assets/images/
    - assets/icon.png
"#;

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_asset_scenario_alias_used_elsewhere() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("assets/icon.png", "")
        .write(
            "lib/paths.dart",
            "class Paths { static const logoPath = 'assets/images/logo.png'; }\n",
        )
        .write("lib/home.dart", "import 'paths.dart';\nfinal w = Image.asset(Paths.logoPath);\n");

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    assert_eq!(
        assets.used,
        BTreeSet::from(["assets/images/logo.png".to_string()])
    );
    assert_eq!(assets.unused, vec!["assets/icon.png"]);
    assert_all_partitions(&result);
}

#[test]
fn test_alias_used_only_in_defining_file_is_unused() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("assets/icon.png", "")
        .write(
            "lib/paths.dart",
            r#"
class Paths {
  static const logoPath = 'assets/images/logo.png';
}
final selfUse = Paths.logoPath;
"#,
        )
        .write("lib/home.dart", "void main() {}\n");

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    assert!(assets.unused.contains(&"assets/images/logo.png".to_string()));
    assert!(assets.used.is_empty());
}

#[test]
fn test_direct_literal_elsewhere_overrides_unused_alias() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("assets/icon.png", "")
        .write(
            "lib/paths.dart",
            "class Paths { static const logoPath = 'assets/images/logo.png'; }\n",
        )
        .write(
            "lib/splash.dart",
            "final w = Image.asset('assets/images/logo.png');\n",
        );

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    assert!(assets.is_used(&"assets/images/logo.png".to_string()));
    let refs: Vec<_> = assets
        .references_to(&"assets/images/logo.png".to_string())
        .iter()
        .map(|p| project.rel(p))
        .collect();
    assert_eq!(refs, vec!["lib/splash.dart"]);
}

#[test]
fn test_direct_literal_without_alias() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("assets/icon.png", "")
        .write("lib/main.dart", "final icon = 'assets/icon.png';\n");

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    assert!(assets.is_used(&"assets/icon.png".to_string()));
    assert_eq!(assets.unused, vec!["assets/images/logo.png"]);
}

#[test]
fn test_missing_asset_path_is_skipped_with_warning() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("lib/main.dart", "final logo = 'assets/images/logo.png';\n");

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    assert_eq!(assets.declared, vec!["assets/images/logo.png"]);
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        AnalysisWarning::MissingAssetPath { asset, .. } if asset == "assets/icon.png"
    )));
}

#[test]
fn test_duplicate_alias_warns() {
    let project = Project::new();
    project
        .pubspec(ASSET_PUBSPEC)
        .write("assets/images/logo.png", "")
        .write("assets/icon.png", "")
        .write("lib/a.dart", "class Paths { static const logo = 'assets/images/logo.png'; }\n")
        .write("lib/b.dart", "class Paths { static const logo = 'assets/icon.png'; }\n")
        .write("lib/c.dart", "final x = Paths.logo;\n");

    let result = project.analyze();
    let assets = result.assets.as_ref().unwrap();

    // First file in sorted order wins the key
    assert!(assets.is_used(&"assets/images/logo.png".to_string()));
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, AnalysisWarning::DuplicateAlias { key, .. } if key == "Paths.logo")));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_export_only_file_is_used() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/main.dart", "void main() {}\n")
        .write("lib/barrel.dart", "export 'src/widget.dart';\n")
        .write("lib/src/widget.dart", "class Widget {}\n");

    let result = project.analyze();
    let unused = project.unused_files(&result);

    assert!(!unused.contains(&"lib/src/widget.dart".to_string()));
    assert!(unused.contains(&"lib/barrel.dart".to_string()));
}

#[test]
fn test_part_and_part_of_pair_both_used() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/main.dart", "void main() {}\n")
        .write("lib/model.dart", "part 'model.g.dart';\nclass Model {}\n")
        .write("lib/model.g.dart", "part of 'model.dart';\n");

    let result = project.analyze();
    let unused = project.unused_files(&result);

    assert!(!unused.contains(&"lib/model.dart".to_string()));
    assert!(!unused.contains(&"lib/model.g.dart".to_string()));
    assert!(unused.is_empty());
}

#[test]
fn test_package_self_import_with_dashed_directory() {
    let project = Project::named("my-shop");
    project
        .pubspec("name: my_shop\n")
        .write("lib/main.dart", "import 'package:my_shop/screens/cart.dart';\n")
        .write("lib/screens/cart.dart", "class Cart {}\n")
        .write("lib/screens/legacy.dart", "class Legacy {}\n");

    let result = project.analyze();
    assert_eq!(project.unused_files(&result), vec!["lib/screens/legacy.dart"]);
}

#[test]
fn test_flavor_entry_points() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/main.dart", "void main() {}\n")
        .write("lib/main_staging.dart", "void main() {}\n")
        .write("lib/main_helper_only.dart", "import 'helpers.dart';\n")
        .write("lib/helpers.dart", "")
        .write("lib/src/main.dart", "");

    let result = project.analyze();
    let files = result.files.as_ref().unwrap();

    let entries: Vec<_> = files.entry_points.iter().map(|p| project.rel(p)).collect();
    assert_eq!(
        entries,
        vec!["lib/main.dart", "lib/main_helper_only.dart", "lib/main_staging.dart"]
    );
    assert_eq!(project.unused_files(&result), vec!["lib/src/main.dart"]);
}

#[test]
fn test_file_imported_only_by_unused_file_counts_as_used() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/main.dart", "void main() {}\n")
        .write("lib/dead.dart", "import 'dead_helper.dart';\n")
        .write("lib/dead_helper.dart", "");

    let result = project.analyze();
    assert_eq!(project.unused_files(&result), vec!["lib/dead.dart"]);

    let transitive = project.analyze_with(Config {
        reachability: fluttertidy::ReachabilityMode::Transitive,
        ..Config::default()
    });
    assert_eq!(
        project.unused_files(&transitive),
        vec!["lib/dead.dart", "lib/dead_helper.dart"]
    );
}

#[test]
fn test_non_utf8_source_keeps_its_imports() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/helper.dart", "class Helper {}\n");
    fs::write(
        project.root.join("lib/main.dart"),
        b"import 'helper.dart';\n// caf\xe9\nvoid main() {}\n",
    )
    .unwrap();

    let result = project.analyze();

    assert!(project.unused_files(&result).is_empty());
    assert!(!result
        .warnings
        .iter()
        .any(|w| matches!(w, AnalysisWarning::FileReadFailure { .. })));
}

#[test]
fn test_excluded_and_hidden_directories_are_not_collected() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\n")
        .write("lib/main.dart", "void main() {}\n")
        .write("lib/build/generated.dart", "")
        .write("lib/.cache/tmp.dart", "");

    let result = project.analyze();
    let files = result.files.as_ref().unwrap();
    assert_eq!(files.usage.declared.len(), 1);
}

// ============================================================================
// Dependencies
// ============================================================================

const DEP_PUBSPEC: &str = r#"
name: sample_app
dependencies:
  flutter:
    sdk: flutter
  http: ^1.1.0
  unused_pkg: ^0.1.0
dev_dependencies:
  flutter_test:
    sdk: flutter
  flutter_lints: ^3.0.0
  mocktail: ^1.0.0
  build_runner: ^2.4.0
"#;

#[test]
fn test_dependency_scenario() {
    let project = Project::new();
    project
        .pubspec(DEP_PUBSPEC)
        .write("lib/main.dart", "import 'package:http/http.dart' as http;\n");

    let result = project.analyze();
    let dependencies = result.dependencies.as_ref().unwrap();

    assert_eq!(dependencies.generic.used, BTreeSet::from(["http".to_string()]));
    assert_eq!(dependencies.generic.unused, vec!["unused_pkg"]);
    assert_eq!(dependencies.dev.declared, vec!["mocktail", "build_runner"]);
    assert_all_partitions(&result);
}

#[test]
fn test_suffix_split_dependency_is_used() {
    let project = Project::new();
    project
        .pubspec("name: sample_app\ndependencies:\n  foo_bar: any\n")
        .write("lib/main.dart", "import 'package:foo/bar.dart';\n");

    let result = project.analyze();
    let dependencies = result.dependencies.as_ref().unwrap();
    assert!(dependencies.generic.is_used(&"foo_bar".to_string()));
}

#[test]
fn test_dependencies_found_in_tests_and_stray_files() {
    let project = Project::new();
    project
        .pubspec(DEP_PUBSPEC)
        .write("lib/main.dart", "void main() {}\n")
        .write("test/widget_test.dart", "import 'package:mocktail/mocktail.dart';\n")
        .write(
            "integration_test/app_test.dart",
            "import 'package:http/http.dart';\n",
        )
        .write("tool/codegen.dart", "import 'package:build_runner/build_runner.dart';\n")
        .write("build/stale.dart", "import 'package:unused_pkg/unused_pkg.dart';\n");

    let result = project.analyze();
    let dependencies = result.dependencies.as_ref().unwrap();

    assert_eq!(dependencies.generic.unused, vec!["unused_pkg"]);
    assert!(dependencies.dev.unused.is_empty());
}

#[test]
fn test_excluded_dirs_apply_to_root_scan() {
    let project = Project::new();
    project
        .pubspec(DEP_PUBSPEC)
        .write("lib/main.dart", "import 'package:http/http.dart';\n")
        .write("vendor/legacy.dart", "import 'package:unused_pkg/unused_pkg.dart';\n");

    let scanned = project.analyze();
    assert!(scanned.dependencies.as_ref().unwrap().generic.unused.is_empty());

    let mut config = Config::default();
    config.exclude_dirs.push("vendor".to_string());
    let excluded = project.analyze_with(config);
    assert_eq!(
        excluded.dependencies.as_ref().unwrap().generic.unused,
        vec!["unused_pkg"]
    );
}

// ============================================================================
// Manifest errors and run properties
// ============================================================================

#[test]
fn test_missing_manifest_yields_empty_universes() {
    let project = Project::new();
    project.write("lib/main.dart", "void main() {}\n").write("lib/dead.dart", "");

    let result = project.analyze();

    assert!(result.manifest_missing());
    assert!(result.assets.as_ref().unwrap().declared.is_empty());
    assert!(result.dependencies.as_ref().unwrap().generic.declared.is_empty());
    assert_eq!(project.unused_files(&result), vec!["lib/dead.dart"]);
}

#[test]
fn test_invalid_manifest_yields_empty_universes() {
    let project = Project::new();
    project
        .pubspec("dependencies: [http\nflutter: {")
        .write("lib/main.dart", "import 'package:http/http.dart';\n");

    let result = project.analyze();

    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, AnalysisWarning::InvalidManifest { .. })));
    assert!(result.dependencies.as_ref().unwrap().generic.declared.is_empty());
    assert!(!result.manifest_missing());
}

#[test]
fn test_analysis_is_idempotent() {
    let project = Project::new();
    project
        .pubspec(&format!("{}{}", DEP_PUBSPEC, "flutter:\n  assets:\n    - assets/\n"))
        .write("assets/a.png", "")
        .write("assets/b.png", "")
        .write("lib/main.dart", "import 'src/a.dart';\nimport 'package:http/http.dart';\n")
        .write("lib/src/a.dart", "class R { static const a = 'assets/a.png'; }\n")
        .write("lib/src/b.dart", "final x = R.a;\n");

    let first = project.analyze();
    let second = project.analyze();

    assert_eq!(first.assets, second.assets);
    assert_eq!(
        first.files.as_ref().unwrap().usage,
        second.files.as_ref().unwrap().usage
    );
    assert_eq!(
        first.dependencies.as_ref().unwrap().generic,
        second.dependencies.as_ref().unwrap().generic
    );
    assert_eq!(first.findings(), second.findings());
    assert_all_partitions(&first);
}

#[test]
fn test_only_selected_domains_run() {
    let project = Project::new();
    project.pubspec(ASSET_PUBSPEC).write("lib/main.dart", "");

    let result = Analyzer::new(&project.root, Config::default())
        .with_domains(&[Domain::Assets])
        .run()
        .unwrap();

    assert!(result.assets.is_some());
    assert!(result.files.is_none());
    assert!(result.dependencies.is_none());
}
