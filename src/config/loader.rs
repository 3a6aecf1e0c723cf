//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "BLUEPRINT_LENS_";

const SECTION: &str = "blueprint-lens";

pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let from_file = load_file_config(work_dir, config_path)?;
    apply_env(from_file, Env::prefixed(ENV_PREFIX))
}

/// Layer environment overrides over `config`. Nested keys use `__`.
fn apply_env(config: Config, env: Env) -> Result<Config> {
    Figment::from(Serialized::defaults(config))
        .merge(env.split("__"))
        .extract()
        .context("Invalid configuration override in environment")
}

fn load_file_config(work_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(work_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, supporting a nested [blueprint-lens] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested blueprint-lens section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(work_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "blueprint-lens.toml",
        ".blueprint-lens.toml",
        "blueprint-lens.yml",
        "blueprint-lens.yaml",
    ];

    candidates.iter().map(|candidate| work_dir.join(candidate)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config_with_profiles() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("blueprint-lens.toml"),
            r#"
source_dir = "bundles"
default_profile = "tiny"
redact = false

[profiles.tiny]
includeFullXml = false
includeDataSources = false
maxLength = 2000

[[endpoint_schemes]]
prefix = "mllp:"
protocol = "MLLP"
type = "HL7 Listener"
"#,
        )
        .expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.source_dir, Some(PathBuf::from("bundles")));
        assert_eq!(cfg.default_profile, "tiny");
        assert!(!cfg.redact);
        let tiny = cfg.profiles["tiny"];
        assert_eq!(tiny.max_length, Some(2000));
        assert!(!tiny.include_data_sources);
        assert!(tiny.include_routes);
        assert_eq!(cfg.endpoint_schemes[0].kind, "HL7 Listener");
    }

    #[test]
    fn test_nested_section_in_yaml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("blueprint-lens.yml"),
            "blueprint-lens:\n  structured_data: true\n  blueprint_globs: ['**/*.xml']\n",
        )
        .expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert!(cfg.structured_data);
        assert_eq!(cfg.blueprint_globs, vec!["**/*.xml".to_string()]);
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "redact = \"sometimes\"\n").expect("write");

        assert!(load_file_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_config_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.ini");
        fs::write(&path, "redact = false\n").expect("write");

        assert!(load_file_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_config_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("blueprint-lens.toml"), "blueprint_globs = 123\n").expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        std::env::set_var("BLUEPRINT_LENS_LOADER_TEST_DEFAULT_PROFILE", "compact");
        std::env::set_var("BLUEPRINT_LENS_LOADER_TEST_STRUCTURED_DATA", "true");

        let file = Config { default_profile: "minimal-processing".into(), ..Config::default() };
        let cfg = apply_env(file, Env::prefixed("BLUEPRINT_LENS_LOADER_TEST_")).expect("config");
        assert_eq!(cfg.default_profile, "compact");
        assert!(cfg.structured_data);
        assert!(cfg.redact);

        std::env::remove_var("BLUEPRINT_LENS_LOADER_TEST_DEFAULT_PROFILE");
        std::env::remove_var("BLUEPRINT_LENS_LOADER_TEST_STRUCTURED_DATA");
    }
}
