#![allow(dead_code)]

use git2::{Repository, Signature};
use repo_analyzer::analyzers::dependencies::{normalize_package_name, PackageRegistry};
use repo_analyzer::analyzers::quality::{LintIssue, LintRunner};
use repo_analyzer::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway git repository built commit by commit
pub struct FixtureRepo {
    _dir: TempDir,
    pub path: PathBuf,
    repo: Repository,
}

impl FixtureRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("fixture");
        let repo = Repository::init(&path).expect("init repository");
        Self {
            _dir: dir,
            path,
            repo,
        }
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Write the files and commit them on top of HEAD.
    pub fn commit(&self, files: &[(&str, &str)], message: &str) {
        let mut index = self.repo.index().expect("open index");
        for (name, content) in files {
            let full = self.path.join(name);
            fs::create_dir_all(full.parent().expect("parent dir")).expect("create dirs");
            fs::write(&full, content).expect("write file");
            index.add_path(Path::new(name)).expect("stage file");
        }
        index.write().expect("write index");

        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");
        let sig = Signature::now("Test User", "test@example.com").expect("signature");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit");
    }
}

/// Python source with one function holding `branches` if-statements,
/// padded with assignments to `total_lines` lines.
pub fn branchy_python(branches: usize, total_lines: usize) -> String {
    let mut source = String::from("def dispatch(code):\n    result = 0\n");
    for i in 0..branches {
        source.push_str(&format!("    if code == {}:\n        result = {}\n", i, i * 2));
    }
    source.push_str("    return result\n\n");
    let mut line = source.lines().count();
    while line < total_lines {
        source.push_str(&format!("VALUE_{} = {}\n", line, line));
        line += 1;
    }
    source
}

pub struct StubLinter(pub Vec<LintIssue>);

impl StubLinter {
    pub fn with_codes(codes: &[&str]) -> Self {
        Self(
            codes
                .iter()
                .map(|code| LintIssue {
                    code: Some(code.to_string()),
                })
                .collect(),
        )
    }
}

impl LintRunner for StubLinter {
    fn name(&self) -> &str {
        "stub"
    }

    fn run(&self, _path: &Path) -> Result<Vec<LintIssue>> {
        Ok(self.0.clone())
    }
}

pub struct StubRegistry(pub HashMap<String, String>);

impl StubRegistry {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(n, v)| (normalize_package_name(n), v.to_string()))
                .collect(),
        )
    }
}

impl PackageRegistry for StubRegistry {
    fn installed_version(&self, name: &str) -> Option<String> {
        self.0.get(&normalize_package_name(name)).cloned()
    }
}
