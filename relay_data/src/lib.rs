pub mod http;
pub mod pg;
pub mod store;

pub use http::{Relayer, SendError};
pub use store::{ExchangeStore, StoreError, WriteStep};
pub use store::memory::MemoryExchangeStore;
pub use store::pg::PgExchangeStore;
