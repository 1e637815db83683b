use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The SDK refused a connect/disconnect request synchronously.
    #[error("connection request rejected: {0}")]
    ConnectionRejected(String),
    /// A command that needs a live session was issued without one.
    #[error("no active session")]
    NoActiveSession,
    /// `open` was called while a session already exists.
    #[error("a session is already open")]
    SessionOpen,
}
