use std::fmt::{Display, Formatter};
use std::fmt;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ExchangeId {
    pub request_id: i64,
}

impl Display for ExchangeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "request #{}", self.request_id)
    }
}

/// Column values of a `requests` row before the store assigns its id.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewRequestRow {
    pub method: String,
    pub url: String,
    pub headers: String,
}

/// Column values of a `responses` row, minus the request it belongs to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewResponseRow {
    pub status: i32,
    pub headers: String,
    pub length: i64,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StoredRequest {
    pub id: i64,
    pub method: String,
    pub url: String,
    pub headers: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StoredResponse {
    pub request_id: i64,
    pub status: i32,
    pub headers: String,
    pub length: i64,
}

impl StoredRequest {
    pub fn from_row(id: i64, row: NewRequestRow) -> StoredRequest {
        StoredRequest {
            id,
            method: row.method,
            url: row.url,
            headers: row.headers,
        }
    }
}

impl StoredResponse {
    pub fn from_row(request_id: i64, row: NewResponseRow) -> StoredResponse {
        StoredResponse {
            request_id,
            status: row.status,
            headers: row.headers,
            length: row.length,
        }
    }
}
