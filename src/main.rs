use std::sync::Arc;

use anyhow::{bail, Context};
use app_ducks::config::{Config, ConfigStore};
use app_ducks::env::{Environment, Host, ServerRequest};
use app_ducks::fetch::HttpFetchClient;
use app_ducks::intl::{IntlLoader, IntlState, LoadOptions};
use app_ducks::modules::ModuleMap;
use app_ducks::store::Store;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "app-ducks")]
#[command(about = "Load language packs and negotiate locales the way the ducks do")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a language pack through the server loader and print it as JSON
    Pack(PackArgs),

    /// Print the locale chosen for an Accept-Language header
    Negotiate {
        /// Accept-Language header value, e.g. "fr-CA,fr;q=0.8"
        accept_language: String,
    },
}

#[derive(Args)]
struct PackArgs {
    /// Component whose pack to load
    component_key: String,

    /// Module bundle URL, as <key>=<url> (repeatable)
    #[arg(long = "module", value_name = "KEY=URL")]
    modules: Vec<String>,

    /// Locale to load (defaults to the configured default locale)
    #[arg(long)]
    locale: Option<String>,

    /// Locale to try when the pack is missing
    #[arg(long)]
    fallback_locale: Option<String>,

    /// Fetch this URL instead of the module-derived one
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    app_ducks::logging::init_tracing();

    let config = Config::load().context("Failed to load config")?;

    match cli.command {
        Commands::Pack(args) => run_pack(args, config).await,
        Commands::Negotiate { accept_language } => {
            let host = Host::Server {
                request: Some(ServerRequest::new("https").with_header("accept-language", accept_language)),
            };
            let state = IntlState::build_initial_state(&host, &config.intl.default_locale);
            println!("{}", state.active_locale().unwrap_or(&config.intl.default_locale));
            Ok(())
        }
    }
}

async fn run_pack(args: PackArgs, config: Config) -> anyhow::Result<()> {
    let mut modules = ModuleMap::new();
    for entry in &args.modules {
        let Some((key, url)) = entry.split_once('=') else {
            bail!("Invalid --module '{}', expected <key>=<url>", entry);
        };
        modules.insert(key, url);
    }

    let fetch = HttpFetchClient::new(&config.fetch).context("Failed to build HTTP client")?;
    let store = Store::new(IntlState::new(config.intl.default_locale.clone()));
    let loader = IntlLoader::new(store, Environment::server(), Arc::new(modules), Arc::new(fetch))
        .with_config(ConfigStore::in_memory(config));

    let data = loader
        .load_language_pack(
            &args.component_key,
            LoadOptions {
                locale: args.locale,
                url: args.url,
                fallback_locale: args.fallback_locale,
                ..LoadOptions::default()
            },
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&*data)?);
    Ok(())
}
