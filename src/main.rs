use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use shop_checkout::application::submitter::PurchaseSubmitter;
use shop_checkout::config::CheckoutConfig;
use shop_checkout::domain::cart::CartEmptyFlag;
use shop_checkout::domain::ports::{SharedContext, SharedTransport};
use shop_checkout::infrastructure::http::HttpTransport;
use shop_checkout::infrastructure::in_memory::InMemoryPage;
use shop_checkout::telemetry;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Purchase endpoint to POST to
    endpoint: String,

    /// Cart-empty flag as rendered by the page. Only `true` blocks the purchase.
    #[arg(long)]
    cart_empty: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Anti-forgery token sent with the purchase request
    #[arg(long, env = "SHOP_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Overall request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    // The `reentry` policy is only read by embedders; this binary submits once
    let mut config = match &cli.config {
        Some(path) => CheckoutConfig::load(path).into_diagnostic()?,
        None => CheckoutConfig::default(),
    };
    if cli.csrf_token.is_some() {
        config.csrf_token = cli.csrf_token;
    }
    if cli.timeout_secs.is_some() {
        config.timeout_secs = cli.timeout_secs;
    }

    let transport: SharedTransport = Arc::new(HttpTransport::new(&config).into_diagnostic()?);
    let page = InMemoryPage::new();
    let context: SharedContext = Arc::new(page.clone());
    let submitter = PurchaseSubmitter::new(transport, context).with_policy(config.reentry);

    if submitter.is_disabled(CartEmptyFlag::from(cli.cart_empty)) {
        return Err(miette!("checkout is disabled: the cart is empty"));
    }

    submitter
        .purchase_now(cli.endpoint)
        .await
        .into_diagnostic()?;

    // Output the resulting page state
    let snapshot = page.snapshot().await;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &snapshot).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    Ok(())
}
