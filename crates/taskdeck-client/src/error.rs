use thiserror::Error;

/// Everything a gateway call can fail with. The controller absorbs these at
/// the call site and turns them into notifications; nothing here crosses the
/// render boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed (DNS, refused connection, timeout).
    #[error("request failed: {0}")]
    Network(String),

    /// The response body was not the JSON shape we expect.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// 409 from the server; duplicate name.
    #[error("name is already in use")]
    Conflict,

    /// 404 from the server; the mutation target vanished.
    #[error("target no longer exists")]
    NotFound,

    /// Client-side validation tripped before any network call.
    #[error("{0}")]
    Validation(String),

    /// Any other non-2xx status.
    #[error("server returned status {0}")]
    Status(u16),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
