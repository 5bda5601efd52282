use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::models::{FlatHeaderMap, collapse_first_value};

/// Length reported when the origin did not declare one.
pub const UNKNOWN_LENGTH: i64 = -1;

/// What the origin answered, reduced to status, headers and length.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub headers: FlatHeaderMap,
    pub length: i64,
}

impl RelayResponse {
    /// Builds a response from the raw origin headers, keeping the first value
    /// of each header name.
    pub fn from_origin<I, N, V>(status: u16, headers: I, content_length: Option<u64>) -> RelayResponse
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<[u8]>,
    {
        let length = content_length
            .and_then(|n| i64::try_from(n).ok())
            .unwrap_or(UNKNOWN_LENGTH);

        RelayResponse {
            status,
            headers: collapse_first_value(headers),
            length,
        }
    }
}
