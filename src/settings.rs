use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub completion: CompletionSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
}

#[derive(Deserialize)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

/// Defaults, overridden by an optional config file, overridden by
/// `APP_`-prefixed environment variables (`APP_COMPLETION__API_KEY` etc.).
pub fn load(config_file: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8000)?
        .set_default("application.static_dir", "static")?
        .set_default("database.path", "database.db")?
        .set_default("completion.endpoint", "https://api.openai.com")?
        .set_default("completion.model", "gpt-3.5-turbo")?
        .set_default("completion.timeout_secs", 30)?;
    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path));
    }
    builder
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
