//! The single failure category of the remote store.
//!
//! # Design
//! Every variant is a `RemoteError`; the controller logs it and moves on
//! without branching on the variant. The variants exist only so the log line
//! says what went wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// No response arrived: DNS, connect, TLS or read failure.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("remote rejected request with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not decode into the expected shape.
    #[error("response could not be decoded: {0}")]
    Decode(String),

    /// The request payload could not be encoded to JSON.
    #[error("request could not be encoded: {0}")]
    Encode(String),

    /// The response decoded but did not contain what the operation promises.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
