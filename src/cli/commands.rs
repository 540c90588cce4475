//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// Weathergate CLI
#[derive(Parser, Debug)]
#[command(name = "weathergate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log level implied by the verbosity flag
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and probe upstream connectivity
    Check,

    /// Show client capabilities and auth diagnostics
    Info,

    /// Get current weather conditions for a city
    Current {
        /// City name (e.g. "London", "New York")
        city: String,

        /// Temperature units: metric, imperial, or kelvin
        #[arg(short, long, default_value = "metric")]
        units: String,
    },

    /// Get a multi-day weather forecast for a city
    Forecast {
        /// City name
        city: String,

        /// Number of days to forecast (1-5)
        #[arg(short, long, default_value = "5")]
        days: u32,

        /// Temperature units: metric, imperial, or kelvin
        #[arg(short, long, default_value = "metric")]
        units: String,
    },

    /// Search for cities by name
    Search {
        /// City name or part of a city name
        query: String,

        /// Maximum number of matches (1-10)
        #[arg(short, long, default_value = "5")]
        limit: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_raises_log_level() {
        let cli = Cli::try_parse_from(["weathergate", "check"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.log_level(), tracing::Level::INFO);

        let cli = Cli::try_parse_from(["weathergate", "-v", "check"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_forecast_defaults() {
        let cli = Cli::try_parse_from(["weathergate", "forecast", "London"]).unwrap();
        match cli.command {
            Commands::Forecast { city, days, units } => {
                assert_eq!(city, "London");
                assert_eq!(days, 5);
                assert_eq!(units, "metric");
            }
            other => panic!("expected Forecast, got {other:?}"),
        }
    }
}
