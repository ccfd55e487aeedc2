//! Error types for wallet connection attempts.
//!
//! Every step of a connect attempt fails with a [`ConnectError`]. The view
//! collapses it into a single message for display, while
//! [`ConnectError::kind`] keeps the structured cause available.

use std::fmt;

use crate::chain::ChainId;

/// Message shown when a failure carries no description of its own.
pub const GENERIC_CONNECT_ERROR: &str = "Failed to connect wallet";

/// The requested chain has no registry entry or no configured provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported chain id {0}")]
pub struct UnsupportedChainError(pub ChainId);

/// Error returned by any step of a wallet connect attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// The chain identifier is unknown.
    #[error(transparent)]
    UnsupportedChain(#[from] UnsupportedChainError),

    /// The user or the wallet denied the session or the handshake.
    #[error("{0}")]
    ConnectionRejected(String),

    /// No provider endpoint for the chain could be reached.
    #[error("{0}")]
    NetworkUnavailable(String),
}

/// Structured cause of a [`ConnectError`], kept after the message is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectErrorKind {
    /// See [`ConnectError::UnsupportedChain`].
    UnsupportedChain,
    /// See [`ConnectError::ConnectionRejected`].
    ConnectionRejected,
    /// See [`ConnectError::NetworkUnavailable`].
    NetworkUnavailable,
}

impl ConnectError {
    /// Creates a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::ConnectionRejected(message.into())
    }

    /// Creates a network error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::NetworkUnavailable(message.into())
    }

    /// Returns the structured cause.
    #[must_use]
    pub const fn kind(&self) -> ConnectErrorKind {
        match self {
            Self::UnsupportedChain(_) => ConnectErrorKind::UnsupportedChain,
            Self::ConnectionRejected(_) => ConnectErrorKind::ConnectionRejected,
            Self::NetworkUnavailable(_) => ConnectErrorKind::NetworkUnavailable,
        }
    }

    /// Returns the message shown to the user.
    ///
    /// This is the error's description, or [`GENERIC_CONNECT_ERROR`] when the
    /// description is blank.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_CONNECT_ERROR.to_owned()
        } else {
            message
        }
    }
}

impl fmt::Display for ConnectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnsupportedChain => "unsupported_chain",
            Self::ConnectionRejected => "connection_rejected",
            Self::NetworkUnavailable => "network_unavailable",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_chain_message() {
        let err: ConnectError = UnsupportedChainError(999_999).into();
        assert_eq!(err.kind(), ConnectErrorKind::UnsupportedChain);
        assert_eq!(err.user_message(), "Unsupported chain id 999999");
    }

    #[test]
    fn test_blank_message_falls_back_to_generic() {
        let err = ConnectError::rejected("  ");
        assert_eq!(err.kind(), ConnectErrorKind::ConnectionRejected);
        assert_eq!(err.user_message(), GENERIC_CONNECT_ERROR);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(
            ConnectError::unavailable("down").kind().to_string(),
            "network_unavailable"
        );
        assert_eq!(ConnectError::unavailable("down").user_message(), "down");
    }
}
