use std::time::Duration;

use log::info;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use relay_util::{ConfigContext, ConfigError, IntoConfigResult, MultiTry};

pub const DEFAULT_OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

pub struct Config {
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_ssl_mode: Option<PgSslMode>,
    pub db_max_connections: u32,
    pub db_ensure_schema: bool,
    pub server_host: String,
    pub server_port: u16,
    pub outbound_timeout: Option<Duration>,
    pub serialize_writes: bool,
}

impl Config {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .host(&self.db_host)
            .port(self.db_port)
            .ssl_mode(self.db_ssl_mode.clone().unwrap_or(PgSslMode::Disable))
    }
}

pub fn config_with_prefix(prefix: &str) -> Result<Config, ConfigError> {
    let config = ConfigContext::new(prefix);

    let (
        (db_user, db_password, db_name, db_host, db_port),
        (db_ssl_mode, db_max_connections, db_ensure_schema),
        (server_port, outbound_timeout, serialize_writes),
    ) = database_connection(&config).into_config_result()
        .and_try(database_pool(&config).into_config_result())
        .and_try(server(&config).into_config_result())
        .into_config_result()?;

    let server_host = config.var_opt("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.into());

    info!("Store: {}@{}:{}/{}", db_user, db_host, db_port, db_name);
    info!("Listen address: {}:{}", server_host, server_port);

    Ok(Config {
        db_user,
        db_password,
        db_name,
        db_host,
        db_port,
        db_ssl_mode,
        db_max_connections,
        db_ensure_schema,
        server_host,
        server_port,
        outbound_timeout,
        serialize_writes,
    })
}

fn database_connection(config: &ConfigContext) -> Result<(String, String, String, String, u16), Vec<ConfigError>> {
    config.var("DB_USER")
        .and_try(config.var("DB_PASSWORD"))
        .and_try(config.var("DB_NAME"))
        .and_try(config.var("DB_HOST"))
        .and_try(config.parse::<u16>("DB_PORT"))
}

fn database_pool(config: &ConfigContext) -> Result<(Option<PgSslMode>, u32, bool), Vec<ConfigError>> {
    config.parse_or("DB_SSLMODE", PgSslMode::Disable).map(Some)
        .and_try(config.parse_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS))
        .and_try(config.flag_or("DB_ENSURE_SCHEMA", true))
}

fn server(config: &ConfigContext) -> Result<(u16, Option<Duration>, bool), Vec<ConfigError>> {
    config.parse::<u16>("SERVER_PORT")
        .and_try(config.duration_or("OUTBOUND_TIMEOUT", Some(DEFAULT_OUTBOUND_TIMEOUT)))
        .and_try(config.flag_or("SERIALIZE_WRITES", false))
}
