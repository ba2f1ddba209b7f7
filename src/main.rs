use anyhow::Result;
use clap::Parser;
use repo_analyzer::cli::{Cli, Commands, ConfigOverrides};
use repo_analyzer::commands::{analyze, init};
use repo_analyzer::config::load_config;
use repo_analyzer::observability::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            url,
            output,
            format,
            config,
            extensions,
            exclude_dirs,
            max_file_size,
            token_encoding,
            jobs,
            verbosity,
        } => {
            init_logging(verbosity);

            let overrides = ConfigOverrides {
                format,
                extensions,
                exclude_dirs,
                max_file_size,
                token_encoding,
                jobs,
            };
            let analysis = overrides.apply(load_config(config.as_deref())?);

            let written = analyze::handle_analyze(analyze::AnalyzeConfig {
                url,
                output,
                analysis,
            })?;
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Init { force } => init::init_config(force),
    }
}
