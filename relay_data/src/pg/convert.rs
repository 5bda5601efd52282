use relay_domain::{RelayRequest, RelayResponse};

use crate::pg::models::{NewRequestRow, NewResponseRow};

/// Flattens a domain value into the columns it is stored as. Header maps are
/// written as JSON object text.
pub trait ToRow {
    type Row;
    fn to_row(&self) -> Result<Self::Row, serde_json::Error>;
}

impl ToRow for RelayRequest {
    type Row = NewRequestRow;

    fn to_row(&self) -> Result<Self::Row, serde_json::Error> {
        Ok(NewRequestRow {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: serde_json::to_string(&self.headers)?,
        })
    }
}

impl ToRow for RelayResponse {
    type Row = NewResponseRow;

    fn to_row(&self) -> Result<Self::Row, serde_json::Error> {
        Ok(NewResponseRow {
            status: i32::from(self.status),
            headers: serde_json::to_string(&self.headers)?,
            length: self.length,
        })
    }
}
