use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

use log::{info, warn};
use net2::TcpBuilder;
#[cfg(unix)]
use net2::unix::UnixTcpBuilderExt;
use snafu::{Snafu, ResultExt};

pub const DEFAULT_BACKLOG: i32 = 2048;

#[derive(Debug, Snafu)]
pub enum BindError {
    #[snafu(display("Failed to resolve listen address '{}': {}", addr, source))]
    Resolve {
        addr: String,
        source: io::Error,
    },

    #[snafu(display("Listen address '{}' did not resolve to any socket address", addr))]
    NoAddress {
        addr: String,
    },

    #[snafu(display("Failed to bind any address resolved from '{}': {}", addr, source))]
    Bind {
        addr: String,
        source: io::Error,
    },
}

/// Opens a listening socket with address (and on unix, port) reuse enabled.
pub fn create_listener(addr: SocketAddr, backlog: i32) -> io::Result<TcpListener> {
    let builder = match addr {
        SocketAddr::V4(_) => TcpBuilder::new_v4()?,
        SocketAddr::V6(_) => TcpBuilder::new_v6()?,
    };

    builder.reuse_address(true)?;

    #[cfg(unix)]
    builder.reuse_port(true)?;

    builder.bind(addr)?;
    builder.listen(backlog)
}

/// Binds every socket address `host:port` resolves to.
///
/// Succeeds when at least one address could be bound. Addresses that fail are
/// logged and skipped; when all of them fail the last error is returned.
pub fn bind_all(host: &str, port: u16, backlog: i32) -> Result<Vec<TcpListener>, BindError> {
    let addr = format!("{}:{}", host, port);
    let resolved: Vec<SocketAddr> = (host, port).to_socket_addrs()
        .context(ResolveSnafu { addr: addr.as_str() })?
        .collect();

    let mut last_err = None;
    let mut listeners = Vec::new();

    for socket_addr in resolved {
        match create_listener(socket_addr, backlog) {
            Ok(listener) => {
                info!("Listening on {}", socket_addr);
                listeners.push(listener);
            }
            Err(e) => {
                warn!("Failed to bind {}: {}", socket_addr, e);
                last_err = Some(e);
            }
        }
    }

    if !listeners.is_empty() {
        return Ok(listeners);
    }

    match last_err {
        Some(source) => Err(BindError::Bind { addr, source }),
        None => Err(BindError::NoAddress { addr }),
    }
}
