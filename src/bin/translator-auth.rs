use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinSet;
use tracing::info;
use translator_auth::config::proc_loader::file_to_config;
use translator_auth::observability::metrics::get_metrics;
use translator_auth::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "translator-auth.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// number of concurrent callers sharing one cache
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
    /// dump prometheus metrics after fetching
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = file_to_config(Path::new(&args.config))?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build the cached authenticator
    // -------------------------------

    let authenticator = service_config.build_authenticator()?;

    // -------------------------------
    // 3. Fetch through the shared cache
    // -------------------------------

    let mut callers = JoinSet::new();
    for caller in 0..args.concurrency.max(1) {
        let authenticator = authenticator.clone();
        callers.spawn(async move { (caller, authenticator.get_token().await) });
    }

    let mut authorization = None;
    while let Some(joined) = callers.join_next().await {
        let (caller, token) = joined.context("caller task failed")?;
        let token = token.with_context(|| format!("caller {} could not authenticate", caller))?;
        info!(caller, "caller authenticated");
        authorization.get_or_insert(token);
    }

    if let Some(authorization) = authorization {
        println!("{}", authorization);
    }

    // -------------------------------
    // 4. Metrics
    // -------------------------------

    if args.print_metrics {
        print!("{}", get_metrics().await.encode_text()?);
    }

    Ok(())
}
