pub mod dependencies;
pub mod git_history;
pub mod hotspots;
pub mod python;
pub mod quality;

pub use dependencies::{DependencyAnalyzer, PackageRegistry, SitePackagesRegistry};
pub use hotspots::HotspotFinder;
pub use quality::{LintRunner, QualityAnalyzer, RuffLinter};
