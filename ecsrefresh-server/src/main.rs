use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod aws;
mod cli;
mod commands;
mod config;

use cli::{Args, Mode};
use config::{Config, LogFormat};

/// Initialize console tracing in the configured format
fn initialize_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "info,\
         ecsrefresh_orchestrations=debug,\
         ecsrefresh_server=debug,\
         aws_config=warn"
            .into()
    });

    // Logs go to stderr so command output on stdout stays parseable
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loads .env as well
    let config = Config::load()?;

    initialize_tracing(config.log_format);

    match args.mode {
        Mode::Serve { port } => commands::server::run_serve_mode(&config, port).await,
        Mode::Refresh { payload } => commands::invoke::run_refresh(&config, &payload).await,
        Mode::Verify { payload } => commands::invoke::run_verify(&config, &payload).await,
        Mode::Trigger => commands::invoke::run_trigger(&config).await,
        Mode::Config => commands::system::config(&config),
        Mode::Flows { name } => commands::system::flows(name),
    }
}
