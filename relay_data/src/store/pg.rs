use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::PgPool;
use tokio::sync::Mutex;

use relay_domain::{RelayRequest, RelayResponse};

use crate::pg::convert::ToRow;
use crate::pg::models::ExchangeId;
use crate::pg::ops;
use crate::store::{ExchangeStore, StoreError, SerializeHeadersSnafu, SqlSnafu};

pub struct PgExchangeStore {
    pool: PgPool,
    write_lock: Option<Mutex<()>>,
}

impl PgExchangeStore {
    /// Each call runs in its own transaction on a pooled connection.
    pub fn new(pool: PgPool) -> PgExchangeStore {
        PgExchangeStore {
            pool,
            write_lock: None,
        }
    }

    /// Calls additionally take turns on a single lock held for the whole
    /// transaction, so at most one write is in flight per process.
    pub fn serialized(pool: PgPool) -> PgExchangeStore {
        PgExchangeStore {
            pool,
            write_lock: Some(Mutex::new(())),
        }
    }
}

#[async_trait]
impl ExchangeStore for PgExchangeStore {
    async fn record(&self, request: &RelayRequest, response: &RelayResponse) -> Result<ExchangeId, StoreError> {
        let request_row = request.to_row().context(SerializeHeadersSnafu)?;
        let response_row = response.to_row().context(SerializeHeadersSnafu)?;

        let _guard = match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        ops::exchange::insert(&request_row, &response_row, &self.pool)
            .await
            .context(SqlSnafu)
    }
}
