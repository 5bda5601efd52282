pub mod models;

pub use models::{
    RelayRequest,
    RelayResponse,
    FlatHeaderMap,
    TargetError,
};
