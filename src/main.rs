use std::sync::Arc;

use clap::Parser;
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

use folio::app::{App, AppError};
use folio::chat::config::{DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use folio::chat::{ChatConfig, ChatTimeouts, ChatWidget, HttpTransport};
use folio::render;

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Portfolio assistant chat widget")]
struct Cli {
    /// Origin of the chat service; requests go to `{api_url}/chat`.
    #[arg(long, env = "FOLIO_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    #[arg(long, env = "FOLIO_CHAT_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "FOLIO_CHAT_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Show the launcher but refuse to open the chat.
    #[arg(long, env = "FOLIO_CHAT_DISABLED")]
    disabled: bool,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // The local offset can only be read before any other thread exists.
    let offset = render::local_offset();
    let cli = Cli::parse();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, offset))
}

async fn run(cli: Cli, offset: UtcOffset) -> Result<(), AppError> {
    let timeouts = ChatTimeouts { request_secs: cli.timeout_secs, connect_secs: cli.connect_timeout_secs };
    let config = ChatConfig::new(Some(cli.api_url.as_str()), timeouts, cli.disabled)?;

    let transport = HttpTransport::new(&config)?;
    tracing::info!(
        url = transport.url(),
        timeout_secs = config.timeouts.request_secs,
        disabled = config.disabled,
        "chat widget ready"
    );

    let widget = if config.disabled { ChatWidget::disabled() } else { ChatWidget::new() };
    App::new(widget, Arc::new(transport), offset).run().await
}
