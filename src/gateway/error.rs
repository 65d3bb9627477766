//! The single gateway failure kind: a remote operation failed.

use std::fmt;

use thiserror::Error;

/// Which gateway call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    List,
    Create,
    Update,
    Delete,
}

impl GatewayOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayOperation::List => "list",
            GatewayOperation::Create => "create",
            GatewayOperation::Update => "update",
            GatewayOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the remote operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Connection refused, DNS, timeout, or any other transport problem.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("unexpected status {status}")]
    Status { status: u16 },
    /// 2xx, but the body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Failure injected by [`InMemoryGateway::fail_next`](super::InMemoryGateway::fail_next).
    #[error("injected failure")]
    Injected,
}

/// A gateway call did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote {operation} failed: {reason}")]
pub struct GatewayError {
    pub operation: GatewayOperation,
    #[source]
    pub reason: FailureReason,
}

impl GatewayError {
    pub fn new(operation: GatewayOperation, reason: FailureReason) -> Self {
        Self { operation, reason }
    }

    pub fn status(operation: GatewayOperation, status: u16) -> Self {
        Self::new(operation, FailureReason::Status { status })
    }

    pub fn transport(operation: GatewayOperation, err: impl fmt::Display) -> Self {
        Self::new(operation, FailureReason::Transport(err.to_string()))
    }

    pub fn decode(operation: GatewayOperation, err: impl fmt::Display) -> Self {
        Self::new(operation, FailureReason::Decode(err.to_string()))
    }

    /// The HTTP status, when the server answered with one.
    pub fn status_code(&self) -> Option<u16> {
        match self.reason {
            FailureReason::Status { status } => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
