//! Installed package lookup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Answers which version of a package is installed
pub trait PackageRegistry: Send + Sync {
    fn installed_version(&self, name: &str) -> Option<String>;
}

/// PEP 503 name normalization: lowercase, runs of `-_.` become one `-`.
pub fn normalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut last_was_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_separator {
                normalized.push('-');
            }
            last_was_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            last_was_separator = false;
        }
    }
    normalized
}

/// Index of `*.dist-info` and `*.egg-info` metadata directories
#[derive(Debug, Default, Clone)]
pub struct SitePackagesRegistry {
    packages: HashMap<String, String>,
}

impl SitePackagesRegistry {
    /// Index the given site-packages directories. Earlier directories win.
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        let mut packages = HashMap::new();
        for dir in dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if let Some((name, version)) = read_metadata_dir(&entry.path()) {
                    packages.entry(normalize_package_name(&name)).or_insert(version);
                }
            }
        }
        tracing::debug!(packages = packages.len(), "Indexed installed packages");
        Self { packages }
    }

    /// Site-packages of a venv inside `repo_root`, else of the Python
    /// interpreter on `PATH`.
    pub fn discover(repo_root: &Path) -> Self {
        let dirs: Vec<PathBuf> = [".venv", "venv"]
            .iter()
            .filter_map(|name| find_site_packages_in_venv(&repo_root.join(name)))
            .collect();
        if !dirs.is_empty() {
            return Self::from_dirs(&dirs);
        }
        Self::from_dirs(&interpreter_site_packages())
    }

}

impl PackageRegistry for SitePackagesRegistry {
    fn installed_version(&self, name: &str) -> Option<String> {
        self.packages.get(&normalize_package_name(name)).cloned()
    }
}

/// `(name, version)` from a metadata directory such as
/// `requests-2.31.0.dist-info`. Falls back to the `Version:` header when
/// the directory name carries no version.
fn read_metadata_dir(path: &Path) -> Option<(String, String)> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    let (stem, metadata_file) = if let Some(stem) = file_name.strip_suffix(".dist-info") {
        (stem, "METADATA")
    } else if let Some(stem) = file_name.strip_suffix(".egg-info") {
        (stem, "PKG-INFO")
    } else {
        return None;
    };

    match stem.split_once('-') {
        Some((name, rest)) => {
            let version = rest.split('-').next().unwrap_or(rest);
            Some((name.to_string(), version.to_string()))
        }
        None => {
            let metadata = fs::read_to_string(path.join(metadata_file)).ok()?;
            let version = metadata
                .lines()
                .find_map(|line| line.strip_prefix("Version:"))?
                .trim()
                .to_string();
            Some((stem.to_string(), version))
        }
    }
}

fn find_site_packages_in_venv(venv: &Path) -> Option<PathBuf> {
    // Unix: lib/pythonX.Y/site-packages
    if let Ok(entries) = fs::read_dir(venv.join("lib")) {
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with("python") {
                let site_packages = entry.path().join("site-packages");
                if site_packages.is_dir() {
                    return Some(site_packages);
                }
            }
        }
    }

    // Windows: Lib/site-packages
    let lib_dir = venv.join("Lib").join("site-packages");
    lib_dir.is_dir().then_some(lib_dir)
}

const SITE_QUERY: &str = "import site\nfor p in site.getsitepackages() + [site.getusersitepackages()]: print(p)";

fn interpreter_site_packages() -> Vec<PathBuf> {
    let Some(python) = which::which("python3")
        .or_else(|_| which::which("python"))
        .ok()
    else {
        tracing::warn!("No Python interpreter found; installed versions are unknown");
        return Vec::new();
    };

    match Command::new(&python).args(["-c", SITE_QUERY]).output() {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(PathBuf::from)
            .filter(|p| p.is_dir())
            .collect(),
        Ok(output) => {
            tracing::warn!(
                "{} could not report site-packages: {}",
                python.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Failed to run {}: {}", python.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("Flask_SQLAlchemy"), "flask-sqlalchemy");
        assert_eq!(normalize_package_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_package_name("a__-b"), "a-b");
    }

    #[test]
    fn test_indexes_dist_and_egg_info() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("site-packages");
        fs::create_dir_all(site.join("Flask_Cors-4.0.1.dist-info")).unwrap();
        fs::create_dir_all(site.join("six-1.16.0-py3.11.egg-info")).unwrap();
        let local = site.join("localpkg.egg-info");
        fs::create_dir_all(&local).unwrap();
        fs::write(local.join("PKG-INFO"), "Name: localpkg\nVersion: 0.3.0\n").unwrap();
        fs::create_dir_all(site.join("not_metadata")).unwrap();

        let registry = SitePackagesRegistry::from_dirs(&[site]);
        assert_eq!(registry.packages.len(), 3);
        assert_eq!(registry.installed_version("flask-cors"), Some("4.0.1".into()));
        assert_eq!(registry.installed_version("six"), Some("1.16.0".into()));
        assert_eq!(registry.installed_version("LocalPkg"), Some("0.3.0".into()));
        assert_eq!(registry.installed_version("absent"), None);
    }

    #[test]
    fn test_discover_prefers_repository_venv() {
        let temp = TempDir::new().unwrap();
        let site = temp
            .path()
            .join(".venv")
            .join("lib")
            .join("python3.12")
            .join("site-packages");
        fs::create_dir_all(site.join("attrs-23.2.0.dist-info")).unwrap();

        let registry = SitePackagesRegistry::discover(temp.path());
        assert_eq!(registry.installed_version("attrs"), Some("23.2.0".into()));
    }
}
