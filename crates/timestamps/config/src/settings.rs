use core::num::NonZeroU32;

use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use timestamps_field::FieldContext;
use timestamps_store::{TimestampStore, TimestampStoreError, establish_pool};

const BASE_CONFIG: &str = include_str!("base_config.ron");

/// Loads the configuration from the base config and environment variables.
///
/// Environment variables use double underscores `__` to denote nested keys.
/// For example, `TIMESTAMPS_DB__DB_URL` corresponds to `db.db_url`.
///
/// # Errors
///
/// If the configuration could not be loaded or parsed
pub fn get_configuration() -> Result<Config, ConfigError> {
    load_configuration(Config::environment())
}

fn load_configuration(environment: Environment) -> Result<Config, ConfigError> {
    config::Config::builder()
        .add_source(File::from_str(BASE_CONFIG, FileFormat::Ron))
        .add_source(environment)
        .build()?
        .try_deserialize()
}

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database configuration
    pub db: DbConfig,

    /// Context handed to date-time fields when loading
    pub field: FieldContext,
}

/// Database configuration settings.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    /// Path of the SQLite database, or `:memory:`
    pub db_url: String,

    /// Maximum number of database connections in the pool
    pub max_conn: NonZeroU32,
}

impl Config {
    const CONFIG_ENV_PREFIX: &str = "TIMESTAMPS";

    fn environment() -> Environment {
        Environment::with_prefix(Self::CONFIG_ENV_PREFIX).prefix_separator("_").separator("__")
    }
}

impl DbConfig {
    /// Opens a store on the configured database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be established or a migration fails.
    #[tracing::instrument(skip(self), fields(db_url = %self.db_url))]
    pub fn open_store(&self) -> Result<TimestampStore, TimestampStoreError> {
        let pool = establish_pool(self.db_url.as_str(), self.max_conn).map_err(|err| {
            tracing::error!(%err, "failed to establish pool");
            TimestampStoreError::Pool
        })?;

        let store = TimestampStore::new(pool);
        store.migrate()?;

        Ok(store)
    }
}
