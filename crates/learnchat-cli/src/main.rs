//! Terminal front-end for the learnchat assistant.

mod command;
mod repl;

use anyhow::{Context, bail};
use clap::Parser;
use learnchat_client::{ApiClient, AuthClient, HttpCatalogClient, HttpChatTransport};
use learnchat_config::LearnchatConfig;
use learnchat_core::{ChatWidget, EventBus, WidgetDeps, WidgetSettings};
use learnchat_store::{AuthSession, FileStore};
use log::{debug, info};
use repl::Repl;
use std::path::PathBuf;
use std::sync::Arc;

const API_URL_ENV: &str = "LEARNCHAT_API_URL";

/// Command-line options for the chat client.
#[derive(Parser)]
#[command(name = "learnchat", version)]
struct Cli {
    /// Optional path to a learnchat.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// API base URL, overriding config and LEARNCHAT_API_URL
    #[arg(long)]
    api_url: Option<String>,
    /// Path of the local key-value store file
    #[arg(long)]
    store: Option<PathBuf>,
    /// Ignore any stored login and chat as a guest
    #[arg(long)]
    guest: bool,
}

/// Entry point for the learnchat CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    learnchat::init_logging();
    learnchat::install_panic_reporter();

    let cli = Cli::parse();
    info!(
        "starting learnchat (config_set={}, api_url_set={}, store_set={}, guest={})",
        cli.config.is_some(),
        cli.api_url.is_some(),
        cli.store.is_some(),
        cli.guest
    );
    let config = load_config(&cli)?;

    let store_path = match cli.store.clone().or(config.storage.path.clone().map(PathBuf::from)) {
        Some(path) => path,
        None => match FileStore::default_path() {
            Some(path) => path,
            None => bail!("no data directory available; pass --store"),
        },
    };
    let store = Arc::new(FileStore::open(&store_path).context("failed to open store")?);
    info!("using store (path={})", store_path.display());

    let session = AuthSession::new(store.clone());
    let user = if cli.guest {
        None
    } else {
        session.current_user()
    };

    let api = ApiClient::from_config(&config.api).context("failed to build http client")?;
    let transport = HttpChatTransport::new(
        api.clone(),
        config.api.chat_timeout(),
        config.suggestions.fallback.clone(),
    );
    let catalog = HttpCatalogClient::new(api.clone(), session.clone());
    let auth = AuthClient::new(api, session.clone());
    let events = EventBus::new(64);

    let widget = Arc::new(ChatWidget::new(
        WidgetSettings::from_config(&config),
        WidgetDeps {
            store,
            transport: Arc::new(transport),
            catalog: Arc::new(catalog),
            events: Arc::new(events.clone()),
        },
        user,
    ));

    Repl::new(widget, session, auth, events).run().await
}

fn load_config(cli: &Cli) -> anyhow::Result<LearnchatConfig> {
    let mut config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        LearnchatConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        info!("loading layered config from cwd: {}", cwd.display());
        let layered =
            LearnchatConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };

    let env_url = std::env::var(API_URL_ENV).ok().filter(|url| !url.trim().is_empty());
    if let Some(url) = cli.api_url.clone().or(env_url) {
        debug!("overriding api base url (base_url={url})");
        config.api.base_url = url;
    }
    config.validate().context("invalid config")?;
    Ok(config)
}
