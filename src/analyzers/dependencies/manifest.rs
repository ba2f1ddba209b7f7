//! Dependency manifests and requirement lines.

use serde::Deserialize;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Requirements,
    PyProject,
    SetupPy,
}

impl ManifestKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "requirements.txt" => Some(Self::Requirements),
            "pyproject.toml" => Some(Self::PyProject),
            "setup.py" => Some(Self::SetupPy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub operator: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub specs: Vec<VersionSpec>,
}

impl Requirement {
    /// Version of the first specifier, as written
    pub fn declared_version(&self) -> Option<&str> {
        self.specs.first().map(|s| s.version.as_str())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Parse one requirement specifier such as `requests[socks]>=2.31,<3`.
///
/// Comments, blank lines, pip options and anything that is not a
/// name-based requirement (URLs, paths) give `None`.
pub fn parse_requirement(line: &str) -> Option<Requirement> {
    let line = match line.find(" #") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.split(';').next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }

    let name_end = line
        .find(|c: char| "[(<>=!~;".contains(c) || c.is_whitespace())
        .unwrap_or(line.len());
    let name = &line[..name_end];
    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }

    let mut rest = line[name_end..].trim_start();
    if rest.starts_with('[') {
        rest = rest.find(']').map(|end| &rest[end + 1..]).unwrap_or("");
    }
    let rest = rest.trim().trim_start_matches('(').trim_end_matches(')');

    let specs = if rest.trim_start().starts_with('@') {
        Vec::new()
    } else {
        rest.split(',')
            .filter_map(|clause| {
                let clause = clause.trim();
                let op_end = clause
                    .find(|c: char| !"<>=!~".contains(c))
                    .unwrap_or(clause.len());
                let (operator, version) = clause.split_at(op_end);
                let version = version.trim();
                (!operator.is_empty() && !version.is_empty()).then(|| VersionSpec {
                    operator: operator.to_string(),
                    version: version.to_string(),
                })
            })
            .collect()
    };

    Some(Requirement {
        name: name.to_string(),
        specs,
    })
}

pub fn parse_requirements_txt(content: &str) -> Vec<Requirement> {
    content.lines().filter_map(parse_requirement).collect()
}

#[derive(Debug, Deserialize)]
struct PyProject {
    project: Option<ProjectTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    #[serde(default)]
    dependencies: Vec<String>,
}

/// Requirements from the `[project].dependencies` array.
pub fn parse_pyproject(content: &str) -> Result<Vec<Requirement>> {
    let pyproject: PyProject = toml::from_str(content)?;
    Ok(pyproject
        .project
        .map(|p| p.dependencies)
        .unwrap_or_default()
        .iter()
        .filter_map(|d| parse_requirement(d))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn spec(operator: &str, version: &str) -> VersionSpec {
        VersionSpec {
            operator: operator.into(),
            version: version.into(),
        }
    }

    #[test]
    fn test_pinned_requirement() {
        let req = parse_requirement("requests==2.31.0").unwrap();
        assert_eq!(req.name, "requests");
        assert_eq!(req.specs, vec![spec("==", "2.31.0")]);
        assert_eq!(req.declared_version(), Some("2.31.0"));
    }

    #[test]
    fn test_extras_ranges_and_markers() {
        let req =
            parse_requirement("uvicorn[standard] >= 0.20, <1.0 ; python_version >= '3.8'").unwrap();
        assert_eq!(req.name, "uvicorn");
        assert_eq!(req.specs, vec![spec(">=", "0.20"), spec("<", "1.0")]);
    }

    #[test]
    fn test_bare_name_has_no_version() {
        let req = parse_requirement("numpy  # scientific").unwrap();
        assert_eq!(req.name, "numpy");
        assert_eq!(req.declared_version(), None);
    }

    #[test]
    fn test_non_requirements_are_skipped() {
        assert_eq!(parse_requirement(""), None);
        assert_eq!(parse_requirement("# pinned below"), None);
        assert_eq!(parse_requirement("-r base.txt"), None);
        assert_eq!(parse_requirement("--index-url https://pypi.org/simple"), None);
        assert_eq!(parse_requirement("./local/package"), None);
        assert_eq!(parse_requirement("git+https://github.com/a/b.git"), None);
    }

    #[test]
    fn test_direct_reference_has_no_version() {
        let req = parse_requirement("pkg @ https://example.com/pkg.whl").unwrap();
        assert_eq!(req.name, "pkg");
        assert!(req.specs.is_empty());
    }

    #[test]
    fn test_requirements_file() {
        let reqs = parse_requirements_txt(indoc! {"
            # core
            flask==2.0.1
            -e .

            click~=8.1
        "});
        let names: Vec<_> = reqs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["flask", "click"]);
        assert_eq!(reqs[1].specs, vec![spec("~=", "8.1")]);
    }

    #[test]
    fn test_pyproject_dependencies() {
        let reqs = parse_pyproject(indoc! {r#"
            [project]
            name = "demo"
            dependencies = ["httpx>=0.24", "rich"]

            [tool.ruff]
            line-length = 100
        "#})
        .unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].declared_version(), Some("0.24"));
        assert_eq!(reqs[1].name, "rich");
    }

    #[test]
    fn test_pyproject_without_project_table() {
        assert!(parse_pyproject("[tool.poetry]\nname = \"x\"\n").unwrap().is_empty());
        assert!(parse_pyproject("not = [valid").is_err());
    }

    #[test]
    fn test_manifest_kinds() {
        assert_eq!(
            ManifestKind::from_file_name("requirements.txt"),
            Some(ManifestKind::Requirements)
        );
        assert_eq!(ManifestKind::from_file_name("setup.py"), Some(ManifestKind::SetupPy));
        assert_eq!(ManifestKind::from_file_name("requirements-dev.txt"), None);
    }
}
