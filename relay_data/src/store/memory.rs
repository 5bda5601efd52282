use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use snafu::{ResultExt, ensure};

use relay_domain::{RelayRequest, RelayResponse};

use crate::pg::convert::ToRow;
use crate::pg::models::{ExchangeId, StoredRequest, StoredResponse};
use crate::store::{ExchangeStore, StoreError, WriteStep, RejectedSnafu, SerializeHeadersSnafu};

/// In-process store with the same all-or-nothing behaviour as the Postgres
/// one. A failing step can be configured to exercise the rollback path.
#[derive(Default)]
pub struct MemoryExchangeStore {
    tables: Mutex<Tables>,
    fail_at: Option<WriteStep>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    requests: Vec<StoredRequest>,
    responses: Vec<StoredResponse>,
}

impl MemoryExchangeStore {
    pub fn new() -> MemoryExchangeStore {
        MemoryExchangeStore::default()
    }

    pub fn failing_at(step: WriteStep) -> MemoryExchangeStore {
        MemoryExchangeStore {
            fail_at: Some(step),
            ..MemoryExchangeStore::default()
        }
    }

    pub fn requests(&self) -> Vec<StoredRequest> {
        self.tables().requests.clone()
    }

    pub fn responses(&self) -> Vec<StoredResponse> {
        self.tables().responses.clone()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attempt(&self, step: WriteStep) -> Result<(), StoreError> {
        ensure!(self.fail_at != Some(step), RejectedSnafu { step });
        Ok(())
    }
}

#[async_trait]
impl ExchangeStore for MemoryExchangeStore {
    async fn record(&self, request: &RelayRequest, response: &RelayResponse) -> Result<ExchangeId, StoreError> {
        let request_row = request.to_row().context(SerializeHeadersSnafu)?;
        let response_row = response.to_row().context(SerializeHeadersSnafu)?;

        let mut tables = self.tables();
        let request_id = tables.last_id + 1;

        self.attempt(WriteStep::InsertRequest)?;
        let staged_request = StoredRequest::from_row(request_id, request_row);

        self.attempt(WriteStep::InsertResponse)?;
        let staged_response = StoredResponse::from_row(request_id, response_row);

        self.attempt(WriteStep::Commit)?;
        tables.last_id = request_id;
        tables.requests.push(staged_request);
        tables.responses.push(staged_response);

        Ok(ExchangeId { request_id })
    }
}
