use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a fluttertidy run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names never descended into when collecting Dart sources
    pub exclude_dirs: Vec<String>,

    /// Directory names skipped by the stray project-root scan
    pub root_exclude_dirs: Vec<String>,

    /// Platform-SDK pseudo-dependencies removed before classification
    pub sdk_packages: Vec<String>,

    /// Package name used by `package:` self-imports (defaults to the directory name)
    pub package_name: Option<String>,

    /// Extra entry files, relative to the project root
    pub entry_points: Vec<PathBuf>,

    /// How the file closure is computed
    pub reachability: ReachabilityMode,

    /// Patterns for items that are never reported as unused
    pub retain: Vec<String>,

    /// Report configuration
    pub report: ReportConfig,
}

/// File reachability semantics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityMode {
    /// A file is used when any structural reference lands on it
    #[default]
    Direct,
    /// A file is used when it can be reached from an entry point or library root
    Transitive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,

    /// List the files referencing each used item
    pub show_references: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_dirs: vec!["build".to_string(), "node_modules".to_string()],
            root_exclude_dirs: [
                "lib",
                "test",
                "integration_test",
                "build",
                "ios",
                "android",
                "web",
                "windows",
                "macos",
                "linux",
                ".dart_tool",
                "node_modules",
                ".git",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            sdk_packages: [
                "flutter",
                "flutter_test",
                "flutter_lints",
                "flutter_localizations",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            package_name: None,
            entry_points: vec![],
            reachability: ReachabilityMode::default(),
            retain: vec![],
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_references: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".fluttertidy.yml",
            ".fluttertidy.yaml",
            ".fluttertidy.toml",
            "fluttertidy.yml",
            "fluttertidy.yaml",
            "fluttertidy.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check if an item should never be reported as unused
    pub fn should_retain(&self, item: &str) -> bool {
        self.retain.iter().any(|pattern| glob_match(pattern, item))
    }
}

/// Simple glob matching for patterns like "*.svg", "assets/fonts/*" or "**/generated/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if !suffix.contains('*') && !pattern.starts_with("**") {
            return text.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        if !prefix.contains('*') && !pattern.ends_with("**") {
            return text.starts_with(prefix);
        }
    }

    if pattern.contains("**") {
        // "**/generated/**" must match a whole directory name, not a substring
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern
                .trim_start_matches("**/")
                .trim_end_matches("/**")
                .trim_matches('/');
            let dir_pattern = format!("/{}/", dir_name);
            return text.contains(&dir_pattern) || text.starts_with(&format!("{}/", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }

            if prefix.is_empty() {
                return text.ends_with(suffix);
            }

            if suffix.is_empty() {
                return text.starts_with(prefix);
            }

            return text.starts_with(prefix) && text.ends_with(suffix);
        }
    }

    text == pattern
}
