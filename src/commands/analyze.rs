use anyhow::Context as _;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

use crate::analyzers::dependencies::{DependencyAnalyzer, PackageRegistry, SitePackagesRegistry};
use crate::analyzers::hotspots::HotspotFinder;
use crate::analyzers::quality::{LintRunner, QualityAnalyzer, RuffLinter};
use crate::config::AnalysisConfig;
use crate::core::{current_timestamp, Analysis, AnalysisResult, BasicStats};
use crate::debt::estimate_debt;
use crate::errors::Result;
use crate::io::writers::write_reports;
use crate::io::{FileProcessor, FileWalker};
use crate::repository::{clone_repository, clone_repository_in, parse_repo_url, repo_name_from_url};
use crate::tokens::TokenCounter;

/// Runs every analysis step for one repository.
///
/// The linter and package registry are pluggable so callers can supply
/// their own; by default `ruff` and the local site-packages are used.
pub struct RepositoryAnalyzer {
    config: AnalysisConfig,
    tokens: TokenCounter,
    quality: QualityAnalyzer,
    registry: Option<Box<dyn PackageRegistry>>,
    scratch_dir: Option<PathBuf>,
}

impl RepositoryAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let config = config.validate()?;
        let tokens = TokenCounter::from_name(&config.token_encoding)?;
        let quality = QualityAnalyzer::new(Box::new(RuffLinter::new(config.lint_command.clone())));
        Ok(Self {
            config,
            tokens,
            quality,
            registry: None,
            scratch_dir: None,
        })
    }

    pub fn with_linter(mut self, linter: Box<dyn LintRunner>) -> Self {
        self.quality = QualityAnalyzer::new(linter);
        self
    }

    pub fn with_registry(mut self, registry: Box<dyn PackageRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Place the temporary clone under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Clone `url` and analyse it. The clone is removed before returning.
    pub fn analyze_url(&self, url: &str) -> Result<AnalysisResult> {
        let parsed = parse_repo_url(url);
        let repo_name = repo_name_from_url(&parsed.repo_url);
        let span = info_span!("analyze", repo = %repo_name);
        let _enter = span.enter();

        let checkout = match &self.scratch_dir {
            Some(parent) => clone_repository_in(&parsed.repo_url, parent)?,
            None => clone_repository(&parsed.repo_url)?,
        };
        let scan_root = checkout.scan_root(&parsed.subdirectory)?;
        self.analyze_checkout(checkout.root(), &scan_root, repo_name)
    }

    /// Analyse a working copy already on disk. `scan_root` is the directory
    /// to report on, `repo_root` the top of the git working tree.
    pub fn analyze_checkout(
        &self,
        repo_root: &Path,
        scan_root: &Path,
        repo_name: String,
    ) -> Result<AnalysisResult> {
        let config = &self.config;

        let basic_stats = {
            let _span = info_span!("basic_stats").entered();
            let files = FileWalker::new(scan_root)
                .with_extensions(config.extensions.clone())
                .with_exclude_dirs(config.exclude_dirs.clone())
                .walk();
            let processed = FileProcessor::new(repo_root, config.max_file_size, &self.tokens)
                .process_files(&files, config.worker_count())?;
            BasicStats::from_files(&processed)
        };
        info!(
            files = basic_stats.total_files,
            skipped = basic_stats.skipped_files,
            "Collected repository statistics"
        );

        let code_quality = {
            let _span = info_span!("code_quality").entered();
            self.quality.analyze(scan_root)
        };

        let dependencies = {
            let _span = info_span!("dependencies").entered();
            let discovered;
            let registry: &dyn PackageRegistry = match &self.registry {
                Some(registry) => registry.as_ref(),
                None => {
                    discovered = SitePackagesRegistry::discover(repo_root);
                    &discovered
                }
            };
            DependencyAnalyzer::new(registry).analyze(repo_root, scan_root, &config.exclude_dirs)
        };

        let hot_spots = {
            let _span = info_span!("hotspots").entered();
            HotspotFinder {
                source_extension: &config.source_extension,
                exclude_dirs: &config.exclude_dirs,
            }
            .find(repo_root, scan_root)
        };

        let tech_debt = estimate_debt(&hot_spots, &code_quality);
        info!(
            hotspots = hot_spots.len(),
            dependencies = dependencies.len(),
            debt_hours = tech_debt.total_hours,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            repo_name,
            timestamp: current_timestamp(),
            analysis: Analysis {
                basic_stats,
                code_quality,
                dependencies,
                hot_spots,
                tech_debt,
            },
        })
    }
}

pub struct AnalyzeConfig {
    pub url: String,
    /// Report directory, the current directory when `None`
    pub output: Option<PathBuf>,
    pub analysis: AnalysisConfig,
}

/// Analyse the repository and write the reports. Returns the written paths.
pub fn handle_analyze(config: AnalyzeConfig) -> anyhow::Result<Vec<PathBuf>> {
    let format = config.analysis.output_format;
    let analyzer = RepositoryAnalyzer::new(config.analysis)?;
    let result = analyzer
        .analyze_url(&config.url)
        .with_context(|| format!("Failed to analyze {}", config.url))?;

    let output_dir = match config.output {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    write_reports(&result, &output_dir, format)
}
