/// A repository URL split into the clonable part and an optional subpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRepoUrl {
    pub repo_url: String,
    /// `/`-separated path inside the repository, empty for the root
    pub subdirectory: String,
}

/// Split a browser URL such as `https://host/user/repo/tree/main/src`.
///
/// Everything before the first `tree` or `blob` segment is the clone URL.
/// The segment after it names a branch and is dropped; the rest is the
/// subdirectory.
pub fn parse_repo_url(url: &str) -> ParsedRepoUrl {
    let trimmed = url.trim().trim_end_matches('/');
    let parts: Vec<&str> = trimmed.split('/').collect();

    match parts.iter().position(|p| *p == "tree" || *p == "blob") {
        Some(pos) => ParsedRepoUrl {
            repo_url: parts[..pos].join("/"),
            subdirectory: parts.get(pos + 2..).map(|s| s.join("/")).unwrap_or_default(),
        },
        None => ParsedRepoUrl {
            repo_url: trimmed.to_string(),
            subdirectory: String::new(),
        },
    }
}

/// Last path segment without a `.git` suffix.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}
