use std::time::Duration;

use log::debug;
use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use snafu::{OptionExt, ResultExt, Snafu, ensure};

use relay_domain::{RelayRequest, RelayResponse, TargetError};

#[derive(Snafu, Debug)]
pub enum SendError {
    #[snafu(display("Invalid target URL: {}", source))]
    InvalidTarget {
        source: TargetError,
    },

    #[snafu(display("Request method is empty"))]
    EmptyMethod,

    #[snafu(display("Invalid request method '{}'", method))]
    InvalidMethod {
        method: String,
    },

    #[snafu(display("Invalid header name '{}'", name))]
    InvalidHeaderName {
        name: String,
    },

    #[snafu(display("Invalid value for header '{}'", name))]
    InvalidHeaderValue {
        name: String,
    },

    #[snafu(display("Failed to build HTTP client: {}", source))]
    ClientBuild {
        source: reqwest::Error,
    },

    #[snafu(display("Failed to create outbound request: {}", source))]
    RequestBuild {
        source: reqwest::Error,
    },

    #[snafu(display("Timed out waiting for target: {}", source))]
    Timeout {
        source: reqwest::Error,
    },

    #[snafu(display("Failed to complete HTTP request: {}", source))]
    Transport {
        source: reqwest::Error,
    },
}

impl SendError {
    /// Whether the caller's payload is at fault, as opposed to the relay or
    /// the origin.
    pub fn is_client_error(&self) -> bool {
        match self {
            SendError::InvalidTarget { .. }
            | SendError::EmptyMethod
            | SendError::InvalidMethod { .. }
            | SendError::InvalidHeaderName { .. }
            | SendError::InvalidHeaderValue { .. } => true,

            SendError::ClientBuild { .. }
            | SendError::RequestBuild { .. }
            | SendError::Timeout { .. }
            | SendError::Transport { .. } => false,
        }
    }
}

/// Performs relay calls against origins. No retries, redirects are followed
/// the way reqwest does by default.
pub struct Relayer {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Relayer {
    pub fn new(timeout: Option<Duration>) -> Result<Relayer, SendError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        let client = builder.build().context(ClientBuildSnafu)?;
        Ok(Relayer { client, timeout })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validates the payload and turns it into an outbound request. Nothing
    /// is sent.
    pub fn build(&self, request: &RelayRequest) -> Result<reqwest::Request, SendError> {
        let url = request.target_url().context(InvalidTargetSnafu)?;

        let method = request.method.as_str();
        ensure!(!method.is_empty(), EmptyMethodSnafu);
        let method = Method::from_bytes(method.as_bytes()).ok()
            .context(InvalidMethodSnafu { method })?;

        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in request.headers.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).ok()
                .context(InvalidHeaderNameSnafu { name: name.as_str() })?;
            let header_value = HeaderValue::from_str(value).ok()
                .context(InvalidHeaderValueSnafu { name: name.as_str() })?;

            headers.insert(header_name, header_value);
        }

        self.client.request(method, url)
            .headers(headers)
            .build()
            .context(RequestBuildSnafu)
    }

    /// Sends the call and reduces the origin's answer to a [`RelayResponse`].
    ///
    /// Any status the origin returns counts as a successful relay. The body
    /// is never read; it is released as soon as the metadata is taken.
    pub async fn send(&self, request: &RelayRequest) -> Result<RelayResponse, SendError> {
        let outbound = self.build(request)?;
        debug!("Relaying {} {}", outbound.method(), outbound.url());

        let response = self.client.execute(outbound).await
            .map_err(|source| {
                if source.is_timeout() {
                    SendError::Timeout { source }
                } else {
                    SendError::Transport { source }
                }
            })?;

        // `content_length()` reports the framed body size, which is zero for
        // HEAD and 304. The relayed length is what the origin declared.
        let declared_length = response.headers().get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let relayed = RelayResponse::from_origin(
            response.status().as_u16(),
            response.headers().iter().map(|(k, v)| (k.as_str(), v.as_bytes())),
            declared_length);

        drop(response);
        Ok(relayed)
    }
}
