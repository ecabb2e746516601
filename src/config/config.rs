use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::twitch::TwitchConfig;

/// Environment variable naming the YAML file to load.
pub const CONFIG_PATH_ENV: &str = "VIEWERHUB_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub twitch: TwitchConfig,
    /// Serve canned data on every route, as if `mock=1` was always passed.
    #[serde(default)]
    pub demo: bool,
}

/// Builds the figment: YAML file first, then `VIEWERHUB_*` overrides, then
/// the bare `TWITCH_*` variables.
pub fn figment(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed("VIEWERHUB_").ignore(&["config"]).split("__"))
        .merge(
            Env::raw()
                .only(&["TWITCH_CLIENT_ID", "TWITCH_CLIENT_SECRET", "TWITCH_CHANNEL"])
                .map(|key| {
                    let nested = match key.as_str().to_ascii_lowercase().as_str() {
                        "twitch_client_id" => "twitch.client_id",
                        "twitch_client_secret" => "twitch.client_secret",
                        _ => "twitch.default_channel",
                    };
                    nested.into()
                }),
        )
}

/// Extracts a versioned config from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from the YAML file named by `VIEWERHUB_CONFIG` (default "./config.yaml").
pub fn load_config() -> ConfigV1 {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match extract_config(&figment(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
