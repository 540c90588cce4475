//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::tools;
use crate::weather::WeatherService;
use serde_json::{json, Value};
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = Config::from_env()?;
        config.validate()?;

        let client = Arc::new(ApiClient::from_config(&config));
        let service = WeatherService::new(Arc::clone(&client), config.api.api_key.clone());

        let output = match &self.cli.command {
            Commands::Check => self.check(&service, &config).await,
            Commands::Info => self.info(&service).await,
            Commands::Current { city, units } => {
                tools::current_weather(&service, city, units).await
            }
            Commands::Forecast { city, days, units } => {
                tools::forecast(&service, city, *days, units).await
            }
            Commands::Search { query, limit } => {
                tools::search_cities(&service, query, *limit).await
            }
        };

        println!("{}", serde_json::to_string_pretty(&output)?);

        // Explicit shutdown path for the shared session
        client.close().await;
        Ok(())
    }

    /// Validate configuration and probe the upstream API
    async fn check(&self, service: &WeatherService, config: &Config) -> Value {
        let mut status = tools::api_status(service).await;
        status["configuration"] = config.debug_info();
        status
    }

    /// Show client capabilities and auth diagnostics
    async fn info(&self, service: &WeatherService) -> Value {
        let client = service.client();
        json!({
            "client": client.api_info().await,
            "auth": client.auth().describe().await,
        })
    }
}
