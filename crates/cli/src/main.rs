mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use dradis_search_api::error::ApiError;
use dradis_search_api::{DradisClient, SearchEngine};
use dradis_search_auth::CredentialStore;
use dradis_search_config::{
    Config, ConfigError, ConnectionSettings, CredentialProvider, FlagProvider, MatchField,
    StoredProvider,
};
use dradis_search_output::{OutputFormat, Reporter};
use prompt::TerminalPrompt;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "dradis-search",
    version,
    about = "Search every Dradis Pro project you can access for matching issues",
    long_about = None
)]
struct Cli {
    /// Term to look for (case-insensitive substring match)
    #[arg(short = 'q', long = "term", visible_alias = "query")]
    term: String,

    /// Dradis base URL, e.g. https://dradis.example.com/pro
    #[arg(long, env = "DRADIS_BASE_URL")]
    base_url: Option<String>,

    /// Dradis API key
    #[arg(long, env = "DRADIS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Path to the saved credentials (defaults to ~/.dradis-search/credentials)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Path to config file (defaults to ~/.dradis-search/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Issue field to search
    #[arg(long, value_enum)]
    match_field: Option<MatchField>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.debug) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if let Some(hint) = suggestion(&err) {
                info!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;
    let match_field = config.resolve_match_field(cli.match_field);
    let settings = resolve_settings(&cli, &config)?;

    debug!(?settings, ?match_field, "Resolved connection settings");

    let client = DradisClient::new(&settings).context("Unable to set up the Dradis client")?;
    let matches = SearchEngine::new(&client, &settings, match_field)
        .search(settings.term())
        .await?;

    Reporter::new(cli.output).render(&matches)
}

/// Flags (or their environment variables) take over entirely when either is
/// given; otherwise the saved credentials are used, asking for them on first run.
fn resolve_settings(cli: &Cli, config: &Config) -> Result<ConnectionSettings> {
    let mut provider: Box<dyn CredentialProvider> =
        if cli.base_url.is_some() || cli.api_key.is_some() {
            debug!("Using connection settings from flags");
            Box::new(FlagProvider::new(
                cli.base_url.clone(),
                cli.api_key.clone(),
                cli.term.clone(),
            ))
        } else {
            let store = match cli.credentials.as_ref().or(config.credentials_path.as_ref()) {
                Some(path) => CredentialStore::new(path),
                None => CredentialStore::default_location()?,
            };
            debug!(path = %store.path().display(), "Using saved connection settings");
            Box::new(StoredProvider::new(store, TerminalPrompt, cli.term.clone()))
        };

    Ok(provider.resolve()?)
}

fn suggestion(err: &anyhow::Error) -> Option<&str> {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        api.suggestion()
    } else if let Some(config) = err.downcast_ref::<ConfigError>() {
        config.suggestion()
    } else {
        None
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,dradis_search=debug,dradis_search_api=debug,dradis_search_config=debug,dradis_search_auth=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}
