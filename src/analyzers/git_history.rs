//! Commit-touch counts from repository history.

use git2::{Repository, Sort};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::errors::Result;

/// How many commits touched each file ending in `suffix`.
///
/// Every commit reachable from HEAD is diffed against its first parent
/// (root commits against the empty tree). A path counts at most once per
/// commit. Keys are repository-relative and `/`-separated. A repository
/// without commits yields an empty map.
pub fn change_frequencies(repo_root: &Path, suffix: &str) -> Result<HashMap<String, usize>> {
    let repo = Repository::open(repo_root)?;
    let mut counts: HashMap<String, usize> = HashMap::new();

    if repo.head().is_err() {
        tracing::debug!("Repository has no HEAD, skipping history");
        return Ok(counts);
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;

    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parents().next() {
            Some(parent) => Some(parent.tree()?),
            None => None,
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let touched: HashSet<String> = diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .filter(|path| path.ends_with(suffix))
            .collect();

        for path in touched {
            *counts.entry(path).or_insert(0) += 1;
        }
    }

    Ok(counts)
}
