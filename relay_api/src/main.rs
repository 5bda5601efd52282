mod api;
mod config;

#[macro_use]
extern crate log;

use std::error::Error;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use listenfd::ListenFd;

use relay_util::init_logging;
use relay_util::tcp::{self, DEFAULT_BACKLOG};
use relay_data::pg::ops;
use relay_data::{ExchangeStore, PgExchangeStore, Relayer};
use crate::config::config_with_prefix;

const DEFAULT_LOG_FILTERS: &'static str =
    "actix_server=info,actix_web=info,sqlx=warn,relay_api=info,relay_data=info,warn";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let env_result = dotenv::dotenv();
    init_logging(DEFAULT_LOG_FILTERS);

    if let Err(err) = env_result {
        warn!("Failed to load .env file: {}", err);
    }

    let config = config_with_prefix("RELAY")?;

    // Database
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(config.connect_options())
        .await?;

    if config.db_ensure_schema {
        ops::schema::ensure(&db_pool).await?;
    }

    let store: Arc<dyn ExchangeStore> = if config.serialize_writes {
        info!("Serializing all exchange writes behind a single lock");
        Arc::new(PgExchangeStore::serialized(db_pool))
    } else {
        Arc::new(PgExchangeStore::new(db_pool))
    };
    let store = web::Data::from(store);

    // Outbound
    let relayer = web::Data::new(Relayer::new(config.outbound_timeout)?);
    match relayer.timeout() {
        Some(t) => info!("Outbound timeout set to {:#?}", t),
        None => warn!("Outbound timeout disabled, an unresponsive origin will hold its call open indefinitely"),
    }

    // Enable receiving passed file descriptors
    // Launch using `systemfd --no-pid -s http::PORT -- cargo watch -x run` to leverage this
    //
    let mut listenfd = ListenFd::from_env();

    // HTTP Server
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new(r#"%{r}a [%a] "%r" %s %b "%{Referer}i" "%{User-Agent}i" %Dms"#))
            .app_data(relayer.clone())
            .app_data(store.clone())
            .service(api::services())
    });

    server = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            info!("Using listenfd");
            server.listen(listener)?
        },
        None => {
            info!("Binding to listen address");
            for s in tcp::bind_all(&config.server_host, config.server_port, DEFAULT_BACKLOG)? {
                server = server.listen(s)?;
            }

            server
        }
    };

    info!("Starting server");
    server.run().await?;
    Ok(())
}
