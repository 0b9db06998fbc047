//! Response lines written back to the serial link.
//!
//! Every command answers with one status line:
//! - `OK: <summary>` on success
//! - `ERROR: <reason>` on failure
//!
//! `help` and `get_config` follow their `OK:` line with a fixed list of
//! plain lines.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::RESPONSE_TERMINATOR;
use crate::error::CliError;

/// Prefix of a success line.
pub const OK_PREFIX: &str = "OK: ";

/// Prefix of a failure line.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// The answer to one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Success, with the summary and any listing lines after it.
    Ok {
        message: String,
        lines: Vec<String>,
    },
    /// Failure.
    Error(CliError),
}

impl Response {
    /// Single-line success.
    pub fn ok(message: impl Into<String>) -> Self {
        Response::Ok {
            message: message.into(),
            lines: Vec::new(),
        }
    }

    /// Success followed by a listing.
    pub fn listing(message: impl Into<String>, lines: Vec<String>) -> Self {
        Response::Ok {
            message: message.into(),
            lines,
        }
    }

    /// Whether this is a success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    /// The first line, prefix included.
    pub fn status_line(&self) -> String {
        match self {
            Response::Ok { message, .. } => format!("{}{}", OK_PREFIX, message),
            Response::Error(err) => format!("{}{}", ERROR_PREFIX, err),
        }
    }

    /// Every line of the response, without terminators.
    pub fn to_lines(&self) -> Vec<String> {
        let mut out = vec![self.status_line()];
        if let Response::Ok { lines, .. } = self {
            out.extend(lines.iter().cloned());
        }
        out
    }

    /// Wire bytes: each line followed by CRLF.
    pub fn encode(&self) -> Bytes {
        let lines = self.to_lines();
        let size: usize = lines
            .iter()
            .map(|l| l.len() + RESPONSE_TERMINATOR.len())
            .sum();
        let mut buf = BytesMut::with_capacity(size);
        for line in &lines {
            buf.put_slice(line.as_bytes());
            buf.put_slice(RESPONSE_TERMINATOR);
        }
        buf.freeze()
    }
}

impl From<CliError> for Response {
    fn from(err: CliError) -> Self {
        Response::Error(err)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lines().join("\n"))
    }
}

/// What the dispatcher decided for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub response: Response,
    /// The device must restart once the response is on the wire.
    pub restart: bool,
}

impl Outcome {
    pub fn respond(response: Response) -> Self {
        Outcome {
            response,
            restart: false,
        }
    }

    pub fn restart_after(response: Response) -> Self {
        Outcome {
            response,
            restart: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_status_line() {
        let response = Response::ok("bl_intensity set to 5");
        assert_eq!(response.status_line(), "OK: bl_intensity set to 5");
        assert!(response.is_ok());
    }

    #[test]
    fn test_error_status_line() {
        let response = Response::from(CliError::UnknownPattern);
        assert_eq!(response.status_line(), "ERROR: Invalid pattern name/index.");
        assert!(!response.is_ok());
    }

    #[test]
    fn test_listing_encodes_crlf_per_line() {
        let response = Response::listing(
            "Current configuration:",
            vec!["a=1".to_string(), "b=2".to_string()],
        );
        assert_eq!(
            &response.encode()[..],
            b"OK: Current configuration:\r\na=1\r\nb=2\r\n"
        );
    }
}
