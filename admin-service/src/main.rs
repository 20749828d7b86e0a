mod api;
mod client;
mod interceptor;
mod models;
mod notify;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::client::{BackendClient, Credentials};
use crate::interceptor::ErrorInterceptor;
use crate::notify::TracingNotifier;

#[derive(Parser)]
#[command(name = "admin-service")]
struct Args {
    #[arg(long, env = "HOTEL_API_URL", default_value = "http://localhost:8000/api")]
    backend_url: String,

    #[arg(long, env = "HOTEL_API_TOKEN")]
    access_token: Option<String>,

    #[arg(long, env = "PORT", default_value = "3002")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.access_token.is_none() {
        info!("No access token configured, calling the backend anonymously");
    }

    let interceptor = ErrorInterceptor::new(Arc::new(TracingNotifier));
    let client = BackendClient::new(
        args.backend_url.clone(),
        Credentials::new(args.access_token),
        interceptor,
    );

    let app = api::create_router(api::AppState { client });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("Admin service started on port {}", args.port);
    info!("Reading hotel data from {}", args.backend_url);

    axum::serve(listener, app).await?;

    Ok(())
}
