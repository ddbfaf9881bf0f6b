use larder_catalog::margin::MarginConfigError;
use larder_catalog::MarginTables;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub pricing: MarginTables,
    #[serde(default)]
    pub quotes: QuoteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuoteConfig {
    /// Buffer size of the renegotiation broadcast channel
    #[serde(default = "default_publish_capacity")]
    pub publish_capacity: usize,
}

fn default_publish_capacity() -> usize { 100 }

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            publish_capacity: default_publish_capacity(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layer `{dir}/default`, `{dir}/{RUN_MODE}`, `{dir}/local` and `LARDER_*` variables.
    /// Grade keys in the files must be lowercase, environment keys always are.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `LARDER_QUOTES__PUBLISH_CAPACITY=16`, `LARDER_PRICING__FRESH__S=4.5`
            .add_source(
                config::Environment::with_prefix("LARDER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }

    /// Parse a TOML document on its own, without files or environment
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Margin tables checked for totality before they reach the engine
    pub fn margin_tables(&self) -> Result<MarginTables, MarginConfigError> {
        self.pricing.validate()?;
        Ok(self.pricing.clone())
    }
}
