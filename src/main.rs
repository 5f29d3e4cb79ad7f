//! Position Calculator - Main Entry Point
//!
//! Runs the price gateway, an interactive live calculator, or a one-shot
//! position-size calculation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use position_calculator::common::traits::PriceSource;
use position_calculator::config::load_config;
use position_calculator::server::{self, AppState};
use position_calculator::{
    AppConfig, CalculatorInput, CalculatorView, GatewayClient, PriceGateway, Session,
    TriggerPolicy,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); defaults to settings.log_level
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve /api/crypto-price and /api/total-capital (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive calculator with live entry prices
    Watch {
        /// Symbol to watch, e.g. BTCUSDT
        #[arg(long)]
        symbol: Option<String>,
        /// Poll a running gateway instead of querying providers directly
        #[arg(long, env = "GATEWAY_URL")]
        gateway: Option<String>,
        /// Only calculate on the `calc` command
        #[arg(long)]
        manual: bool,
    },
    /// Calculate position size and margin once
    Calc {
        #[arg(long)]
        entry: String,
        #[arg(long)]
        stop: String,
        /// Total capital; defaults to the configured value
        #[arg(long)]
        capital: Option<String>,
        /// Risk percent; defaults to the configured value
        #[arg(long)]
        risk: Option<String>,
        #[arg(long, default_value = "5")]
        leverage: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();
    let config = load_config(Some(&args.config))?;

    // Logs go to stderr so the watch session owns stdout
    let level_name = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Configuration file: {}", args.config);

    match args.command.unwrap_or(Command::Serve {
        bind: None,
        port: None,
    }) {
        Command::Serve { bind, port } => run_server(config, bind, port).await,
        Command::Watch {
            symbol,
            gateway,
            manual,
        } => run_watch(config, symbol, gateway, manual).await,
        Command::Calc {
            entry,
            stop,
            capital,
            risk,
            leverage,
        } => {
            let input = CalculatorInput {
                entry_price: entry,
                stop_loss: stop,
                total_capital: capital.unwrap_or(config.capital.total_capital),
                risk_percent: risk.unwrap_or(config.capital.risk),
                leverage,
            };
            let result = input.calculate()?;
            println!("position size: {}", result.position_size);
            println!("margin:        {}", result.margin);
            Ok(())
        }
    }
}

async fn run_server(mut config: AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting price gateway");
    let state = AppState::from_config(&config)?;
    server::serve(&config.server, state).await?;
    Ok(())
}

async fn run_watch(
    config: AppConfig,
    symbol: Option<String>,
    gateway: Option<String>,
    manual: bool,
) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| config.feed.symbol.clone());
    let trigger = if manual {
        TriggerPolicy::Manual
    } else {
        TriggerPolicy::OnComplete
    };
    let mut view = CalculatorView::new(symbol, config.feed.leverage.clone()).with_trigger(trigger);
    let interval = Duration::from_secs(config.feed.poll_interval_seconds);

    match gateway.or_else(|| config.feed.gateway_url.clone()) {
        Some(url) => {
            info!("Polling gateway at {}", url);
            let client = GatewayClient::new(&url)?;
            match client.get_total_capital().await {
                Ok(defaults) => view.apply_defaults(&defaults),
                Err(e) => {
                    warn!("Could not load capital defaults from gateway: {}", e);
                    view.apply_defaults(&config.capital.to_defaults());
                }
            }
            run_session(Arc::new(client), view, interval).await
        }
        None => {
            info!("Querying providers directly");
            view.apply_defaults(&config.capital.to_defaults());
            let gateway = PriceGateway::from_config(&config.providers)?;
            run_session(Arc::new(gateway), view, interval).await
        }
    }
}

async fn run_session<S: PriceSource + 'static>(
    source: Arc<S>,
    view: CalculatorView,
    interval: Duration,
) -> Result<()> {
    println!("{}", position_calculator::session::HELP);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    Session::new(source, view, interval)
        .run(stdin, std::io::stdout())
        .await?;
    Ok(())
}
