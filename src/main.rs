//! This file defines the emission-filters binary entry point.

use emission_filters::app;
use emission_filters::cli;
use emission_filters::metrics;
use emission_filters::server;
use emission_filters::tracing;

use std::process::exit;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing();
    ::tracing::debug!(?args, "parsed command line arguments");
    if let Err(error) = metrics::register_metrics() {
        eprintln!("failed to register metrics: {}", error);
        exit(1)
    }
    let service = match app::service(&args) {
        Ok(service) => service,
        Err(error) => {
            eprintln!("{}", error);
            let mut source = std::error::Error::source(&error);
            while let Some(cause) = source {
                eprintln!("Caused by: {}", cause);
                source = cause.source();
            }
            exit(1)
        }
    };
    if let Err(error) = server::serve(&args, service).await {
        eprintln!("server error: {}", error);
        exit(1)
    }
}
