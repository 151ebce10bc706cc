//! Parsing of `compose port` output

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PortParseError {
    #[error("empty output")]
    Empty,

    #[error("expected host:port, got '{0}'")]
    MissingSeparator(String),

    #[error("invalid port number '{0}'")]
    InvalidPort(String),
}

/// Extract the host port from `compose port` stdout
///
/// The first non-empty line has the form `host:port` (`0.0.0.0:49153`,
/// `[::]:49153`); everything up to the last colon is the host.
pub fn parse_mapped_port(stdout: &str) -> Result<u16, PortParseError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or(PortParseError::Empty)?;

    let (_, port) = line
        .rsplit_once(':')
        .ok_or_else(|| PortParseError::MissingSeparator(line.to_string()))?;

    port.parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| PortParseError::InvalidPort(port.to_string()))
}
