//! Declared versus installed dependency versions.

pub mod manifest;
pub mod registry;
pub mod version;

use std::fs;
use std::path::{Path, PathBuf};

pub use manifest::{parse_pyproject, parse_requirement, parse_requirements_txt, ManifestKind, Requirement};
pub use registry::{normalize_package_name, PackageRegistry, SitePackagesRegistry};
pub use version::{compare_versions, is_outdated};

use crate::core::Dependency;
use crate::errors::Result;
use crate::io::{relative_path, FileWalker};

pub const UNKNOWN_VERSION: &str = "Unknown";

/// Manifests under `scan_root`, in walk order
pub fn find_manifests(scan_root: &Path, exclude_dirs: &[String]) -> Vec<(PathBuf, ManifestKind)> {
    FileWalker::new(scan_root)
        .with_exclude_dirs(exclude_dirs.to_vec())
        .walk()
        .into_iter()
        .filter_map(|path| {
            let kind = ManifestKind::from_file_name(&path.file_name()?.to_string_lossy())?;
            Some((path, kind))
        })
        .collect()
}

fn read_manifest(path: &Path, kind: ManifestKind) -> Result<Vec<Requirement>> {
    let content = fs::read_to_string(path)?;
    match kind {
        ManifestKind::Requirements => Ok(parse_requirements_txt(&content)),
        ManifestKind::PyProject => parse_pyproject(&content),
        ManifestKind::SetupPy => {
            tracing::debug!(manifest = %path.display(), "setup.py is not evaluated");
            Ok(Vec::new())
        }
    }
}

pub struct DependencyAnalyzer<'a> {
    registry: &'a dyn PackageRegistry,
}

impl<'a> DependencyAnalyzer<'a> {
    pub fn new(registry: &'a dyn PackageRegistry) -> Self {
        Self { registry }
    }

    /// Compare every requirement against the registry. Requirements that
    /// are not installed are left out; broken manifests are skipped.
    pub fn analyze(&self, repo_root: &Path, scan_root: &Path, exclude_dirs: &[String]) -> Vec<Dependency> {
        let mut dependencies = Vec::new();

        for (path, kind) in find_manifests(scan_root, exclude_dirs) {
            let manifest = relative_path(&path, repo_root);
            let requirements = match read_manifest(&path, kind) {
                Ok(requirements) => requirements,
                Err(e) => {
                    tracing::warn!(manifest = %manifest, "Skipping unreadable manifest: {}", e);
                    continue;
                }
            };

            for requirement in requirements {
                let Some(installed) = self.registry.installed_version(&requirement.name) else {
                    tracing::debug!(package = %requirement.name, "Not installed, skipping");
                    continue;
                };
                let declared = requirement
                    .declared_version()
                    .unwrap_or(UNKNOWN_VERSION)
                    .to_string();

                dependencies.push(Dependency {
                    outdated: is_outdated(&declared, &installed),
                    vulnerable: false,
                    name: requirement.name,
                    current_version: declared,
                    latest_version: installed,
                    manifest: manifest.clone(),
                });
            }
        }

        dependencies
    }
}
