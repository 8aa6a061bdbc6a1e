use crate::{
    api_client::ApiClient, configuration::Configuration,
    configuration_handler::ConfigurationHandler, http::create_app,
    local_backend::LocalReservations,
};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api_client;
mod backend;
mod business_hours;
mod configuration;
mod configuration_handler;
mod form;
mod form_registry;
mod http;
mod local_backend;
mod slot_generator;
mod submitter;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    println!("###################");
    println!("# {} #", configuration.website_title());
    println!("###################");

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessable at:\n{}", address.clone());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    let app = if let Some(backend_url) = configuration.backend_url() {
        let backend = ApiClient::new(&backend_url, configuration.request_timeout())
            .context("Failed to create reservation backend client")?;
        info!(%backend_url, "Forwarding reservations to backend");
        create_app(backend, configuration)
    } else {
        info!("No backend configured, reservations are kept in memory");
        create_app(LocalReservations::default(), configuration)
    };

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
