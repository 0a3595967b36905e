use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Failure returned by every state-mutating operation of a match.
///
/// None of these are retried internally. Invariant violations (a card missing
/// from the zone it claims to be in, a dangling arena key) are not represented
/// here: they panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A referenced zone, player, card, counter or arrow does not exist.
    #[error("`{0}` was not found")]
    NotFound(String),
    /// The operation is structurally disallowed in the current state.
    #[error("Operation not allowed: {0}")]
    ContextError(String),
    /// A supplied value was rejected by validation.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl GameError {
    pub fn not_found(what: impl Into<String>) -> Self {
        GameError::NotFound(what.into())
    }

    pub fn context(reason: impl Into<String>) -> Self {
        GameError::ContextError(reason.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        GameError::InvalidCommand(reason.into())
    }
}

/// The closed set of result codes handed back to the command layer.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    Ok = 0x00,
    NameNotFound = 0x01,
    ContextError = 0x02,
    InvalidCommand = 0x03,
}

impl<T> From<&Result<T, GameError>> for ResponseCode {
    fn from(result: &Result<T, GameError>) -> Self {
        match result {
            Ok(_) => ResponseCode::Ok,
            Err(GameError::NotFound(_)) => ResponseCode::NameNotFound,
            Err(GameError::ContextError(_)) => ResponseCode::ContextError,
            Err(GameError::InvalidCommand(_)) => ResponseCode::InvalidCommand,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unable to read settings ({0})")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Session `{0}` is closed")]
    Closed(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_from_result() {
        let ok: Result<(), GameError> = Ok(());
        let missing: Result<(), GameError> = Err(GameError::not_found("deck"));
        let context: Result<(), GameError> = Err(GameError::context("empty history"));
        let invalid: Result<(), GameError> = Err(GameError::invalid("pt"));

        assert_eq!(ResponseCode::from(&ok), ResponseCode::Ok);
        assert_eq!(ResponseCode::from(&missing), ResponseCode::NameNotFound);
        assert_eq!(ResponseCode::from(&context), ResponseCode::ContextError);
        assert_eq!(ResponseCode::from(&invalid), ResponseCode::InvalidCommand);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GameError::not_found("hand").to_string(), "`hand` was not found");
        assert_eq!(
            GameError::context("zone has no coordinates").to_string(),
            "Operation not allowed: zone has no coordinates"
        );
    }
}
