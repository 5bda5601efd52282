use serde::{Deserialize, Deserializer, Serialize};
use snafu::{ResultExt, Snafu, ensure};
use url::Url;

use crate::models::FlatHeaderMap;

pub const RELAYABLE_SCHEMES: &[&str] = &["http", "https"];

/// A call the relay is asked to perform on the caller's behalf.
///
/// `method` and `url` are trimmed on the way in, so the values sent to the
/// origin are the values recorded.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct RelayRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub method: String,

    #[serde(default, deserialize_with = "trimmed")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: FlatHeaderMap,
}

#[derive(Debug, Snafu)]
pub enum TargetError {
    #[snafu(display("Target URL is empty"))]
    Empty,

    #[snafu(display("Target URL '{}' is malformed: {}", input, source))]
    Malformed {
        input: String,
        source: url::ParseError,
    },

    #[snafu(display("Target URL scheme '{}' is not relayable", scheme))]
    UnsupportedScheme {
        scheme: String,
    },
}

impl RelayRequest {
    pub fn new(method: impl AsRef<str>, url: impl AsRef<str>) -> RelayRequest {
        RelayRequest {
            method: method.as_ref().trim().to_owned(),
            url: url.as_ref().trim().to_owned(),
            headers: FlatHeaderMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> RelayRequest {
        self.headers.insert(name.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    /// Parses the target URL. Only absolute `http`/`https` URLs are accepted.
    pub fn target_url(&self) -> Result<Url, TargetError> {
        let input = self.url.as_str();
        ensure!(!input.is_empty(), EmptySnafu);

        let url = Url::parse(input)
            .context(MalformedSnafu { input })?;

        ensure!(RELAYABLE_SCHEMES.contains(&url.scheme()), UnsupportedSchemeSnafu {
            scheme: url.scheme(),
        });

        Ok(url)
    }
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_owned())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<FlatHeaderMap, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<FlatHeaderMap>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
