
mod header_name;
pub use header_name::canonical_header_name;

mod headers;
pub use headers::{FlatHeaderMap, collapse_first_value};

mod relay_request;
pub use relay_request::{RelayRequest, TargetError, RELAYABLE_SCHEMES};

mod relay_response;
pub use relay_response::{RelayResponse, UNKNOWN_LENGTH};
