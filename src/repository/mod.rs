//! Fetching the repository under analysis.

mod clone;
mod url;

pub use clone::{clone_repository, clone_repository_in, ClonedRepository};
pub use url::{parse_repo_url, repo_name_from_url, ParsedRepoUrl};
