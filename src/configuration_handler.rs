use crate::configuration::Configuration;
use clap::Parser;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Parser)]
#[command(name = "restaurant_site", about = "Restaurant website with table reservations")]
pub struct ConfigurationHandler {
    #[arg(long, env = "WEBSITE_TITLE", default_value = "Café Fausse")]
    website_title: String,

    #[arg(long, env = "FRONTEND_PATH", default_value = "frontend/index.html")]
    frontend_path: PathBuf,

    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    /// Base URL of the reservation backend, e.g. http://localhost:5000
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,
}

impl ConfigurationHandler {
    /// Reads `.env` (if present), then the command line.
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn website_title(&self) -> String {
        self.website_title.clone()
    }

    fn frontend_path(&self) -> PathBuf {
        self.frontend_path.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn backend_url(&self) -> Option<String> {
        self.backend_url.clone().filter(|url| !url.trim().is_empty())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
