//! Command-line surface. Exactly one action is selected per invocation.

use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use reanalyzer_config::{
    CliOverrides, ConfigLoad, ConfigLoader, ConfigLoaderOptions,
    constants::DEFAULT_CONFIG_PATH,
};
use reanalyzer_model::{AnalysisOutcome, LookupRequest, MissPolicy};
use tracing::{info, warn};

use crate::infra::startup::{build_state, serve};

#[derive(Parser, Debug)]
#[command(name = "reanalyzer", version)]
#[command(
    about = "Caches a Plex library section and asks Plex to re-analyze media by title or filename"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// `.env` file to load before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Library section to use instead of the configured one
    #[arg(short = 'L', long, global = true)]
    pub library_section: Option<String>,

    /// Cache file to use instead of the configured one
    #[arg(short = 'd', long, global = true)]
    pub db_path: Option<PathBuf>,

    /// How a cache miss refreshes the cache: targeted or full_sync
    #[arg(long, global = true)]
    pub miss_policy: Option<MissPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service
    #[command(alias = "listen")]
    Serve(ServeArgs),
    /// Load every item of the library section into the cache
    #[command(alias = "load-all-ratingkeys")]
    LoadAll,
    /// Send matching media to Plex for analysis
    #[command(alias = "analyze-media")]
    Analyze(AnalyzeArgs),
    /// Synchronize the cache with Plex, removing items Plex no longer has
    #[command(alias = "sync-db")]
    Sync,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Server host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("lookup")
        .required(true)
        .args(["title", "filename"])
))]
pub struct AnalyzeArgs {
    /// Exact media title
    #[arg(short, long, alias = "media-title")]
    pub title: Option<String>,

    /// Exact media file basename
    #[arg(short, long, alias = "media-filename")]
    pub filename: Option<String>,
}

impl AnalyzeArgs {
    pub fn lookup(&self) -> LookupRequest {
        LookupRequest {
            title: self.title.clone(),
            filename: self.filename.clone(),
            library_section: None,
        }
    }
}

impl Cli {
    pub fn loader_options(&self) -> ConfigLoaderOptions {
        let (host, port) = match &self.command {
            Command::Serve(args) => (args.host.clone(), args.port),
            _ => (None, None),
        };
        ConfigLoaderOptions {
            config_path: Some(self.config.clone()),
            env_file: self.env_file.clone(),
            overrides: CliOverrides {
                library_section: self.library_section.clone(),
                db_path: self.db_path.clone(),
                host,
                port,
                miss_policy: self.miss_policy,
            },
        }
    }
}

/// Loads configuration and performs the selected action.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ConfigLoad { config, warnings } =
        ConfigLoader::with_options(cli.loader_options())
            .load()
            .context("failed to load configuration")?;
    for warning in warnings.iter() {
        warn!("{warning}");
    }
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }

    let state = build_state(&config).await?;

    match cli.command {
        Command::Serve(_) => serve(&config, state).await,
        Command::LoadAll => {
            let report = state
                .reconciler()
                .reconcile(None)
                .await
                .context("failed to load rating keys from Plex")?;
            println!(
                "Finished storing media data into database ({} items).",
                report.total()
            );
            Ok(())
        }
        Command::Sync => {
            let report = state
                .reconciler()
                .reconcile(None)
                .await
                .context("failed to synchronize database with Plex")?;
            println!(
                "Synchronized database with Plex: {} added, {} updated, {} removed.",
                report.added, report.updated, report.removed
            );
            Ok(())
        }
        Command::Analyze(args) => {
            let outcomes = state
                .dispatcher
                .analyze(&args.lookup(), config.resolver.miss_policy)
                .await
                .context("failed to analyze media")?;
            let mut stdout = std::io::stdout().lock();
            print_outcomes(&outcomes, &mut stdout)?;
            Ok(())
        }
    }
}

/// One line per outcome, in dispatch order.
pub fn print_outcomes(
    outcomes: &[AnalysisOutcome],
    out: &mut impl Write,
) -> std::io::Result<()> {
    for outcome in outcomes {
        writeln!(out, "{}", outcome.detail)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reanalyzer_model::MediaQuery;

    #[test]
    fn analyze_requires_exactly_one_lookup_field() {
        assert!(
            Cli::try_parse_from(["reanalyzer", "analyze"]).is_err(),
            "neither field"
        );
        assert!(
            Cli::try_parse_from([
                "reanalyzer", "analyze", "--title", "A", "--filename", "a.mkv"
            ])
            .is_err(),
            "both fields"
        );

        let cli =
            Cli::try_parse_from(["reanalyzer", "analyze", "--title", "Alien"])
                .unwrap();
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.lookup(), LookupRequest::by_title("Alien"))
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn an_action_is_required() {
        assert!(Cli::try_parse_from(["reanalyzer"]).is_err());
    }

    #[test]
    fn global_overrides_reach_the_loader() {
        let cli = Cli::try_parse_from([
            "reanalyzer",
            "serve",
            "--port",
            "9000",
            "-L",
            "Anime",
            "-d",
            "/tmp/cache.json",
            "--miss-policy",
            "full_sync",
        ])
        .unwrap();
        let options = cli.loader_options();

        assert_eq!(options.config_path, Some(PathBuf::from("config.toml")));
        assert_eq!(options.overrides.port, Some(9000));
        assert_eq!(options.overrides.library_section.as_deref(), Some("Anime"));
        assert_eq!(
            options.overrides.db_path,
            Some(PathBuf::from("/tmp/cache.json"))
        );
        assert_eq!(options.overrides.miss_policy, Some(MissPolicy::FullSync));
    }

    #[test]
    fn legacy_action_names_are_accepted() {
        let cli = Cli::try_parse_from(["reanalyzer", "sync-db"]).unwrap();
        assert!(matches!(cli.command, Command::Sync));
        let cli = Cli::try_parse_from(["reanalyzer", "listen"]).unwrap();
        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn outcomes_print_one_line_each() {
        let query = MediaQuery::title("Dune");
        let outcomes = vec![
            AnalysisOutcome::analyzed(1u64.into(), &query),
            AnalysisOutcome::failed(2u64.into(), "timed out"),
        ];
        let mut buf = Vec::new();
        print_outcomes(&outcomes, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Media 'Dune' successfully sent for analysis!\n\
             Error sending request to analyze media: timed out\n"
        );
    }
}
