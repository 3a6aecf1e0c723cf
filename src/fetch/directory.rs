//! Blueprints laid out on disk, one file or directory per service.

use super::{BlueprintSource, BlueprintText, FetchError};
use crate::utils::read_blueprint;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolution order for a service `svc`:
/// 1. `<root>/svc.xml`
/// 2. `<root>/svc/blueprint.xml`
/// 3. the first file below `<root>/svc/` matching a blueprint glob, in
///    sorted walk order
pub struct DirectorySource {
    root: PathBuf,
    globs: GlobSet,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self, FetchError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|source| FetchError::Pattern { pattern: pattern.clone(), source })?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|source| FetchError::Pattern { pattern: patterns.join(", "), source })?;
        Ok(Self { root: root.into(), globs })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, service: &str) -> Option<PathBuf> {
        if !is_plain_name(service) {
            return None;
        }

        let flat = self.root.join(format!("{service}.xml"));
        if flat.is_file() {
            return Some(flat);
        }

        let dir = self.root.join(service);
        if !dir.is_dir() {
            return None;
        }
        let conventional = dir.join("blueprint.xml");
        if conventional.is_file() {
            return Some(conventional);
        }

        WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| {
                entry
                    .path()
                    .strip_prefix(&dir)
                    .map(|rel| self.globs.is_match(normalize(rel)))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
    }
}

impl BlueprintSource for DirectorySource {
    fn fetch(&self, service: &str) -> Result<BlueprintText, FetchError> {
        let path = self
            .locate(service)
            .ok_or_else(|| FetchError::NotFound { service: service.to_string() })?;
        let (text, encoding) =
            read_blueprint(&path).map_err(|source| FetchError::Io { path: path.clone(), source })?;
        tracing::debug!(service, path = %path.display(), encoding = %encoding, "blueprint fetched");
        Ok(BlueprintText { service: service.to_string(), path, text, encoding })
    }

    fn list_services(&self) -> Result<Vec<String>, FetchError> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|source| FetchError::Io { path: self.root.clone(), source })?;

        let mut services = BTreeSet::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_file() {
                if let Some(stem) = name.strip_suffix(".xml") {
                    services.insert(stem.to_string());
                }
            } else if path.is_dir() && self.locate(name).is_some() {
                services.insert(name.to_string());
            }
        }
        Ok(services.into_iter().collect())
    }
}

/// Service ids are single path components.
fn is_plain_name(service: &str) -> bool {
    !service.is_empty()
        && service != "."
        && service != ".."
        && !service.contains(['/', '\\'])
}

fn normalize(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
