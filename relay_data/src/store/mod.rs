pub mod memory;
pub mod pg;

use std::fmt::{Display, Formatter};
use std::fmt;

use async_trait::async_trait;
use snafu::Snafu;

use relay_domain::{RelayRequest, RelayResponse};

use crate::pg::models::ExchangeId;

/// Durable record of relay calls. An implementation writes the request and
/// its response together or not at all.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    async fn record(&self, request: &RelayRequest, response: &RelayResponse) -> Result<ExchangeId, StoreError>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum WriteStep {
    InsertRequest,
    InsertResponse,
    Commit,
}

impl Display for WriteStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WriteStep::InsertRequest => f.write_str("request insert"),
            WriteStep::InsertResponse => f.write_str("response insert"),
            WriteStep::Commit => f.write_str("commit"),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("Failed to serialize headers: {}", source))]
    SerializeHeaders {
        source: serde_json::Error,
    },

    #[snafu(display("Failed to access database: {}", source))]
    Sql {
        source: sqlx::Error,
    },

    #[snafu(display("Store rejected the {} step", step))]
    Rejected {
        step: WriteStep,
    },
}
