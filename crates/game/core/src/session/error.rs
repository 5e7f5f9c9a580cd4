use crate::bands::BandError;
use crate::error::{DomainError, ErrorCategory, ErrorSeverity, GameError};

use super::types::{SessionId, SessionStatus, Side};

/// Errors raised by [`super::CombatSession`]. Every variant is returned
/// before the session is touched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("{session} is {status}; actions require an ongoing session")]
    NotOngoing {
        session: SessionId,
        status: SessionStatus,
    },

    #[error("{provided} acted out of turn; {expected} acts next")]
    OutOfTurn { expected: Side, provided: Side },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Bands(#[from] BandError),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotOngoing { .. } | Self::OutOfTurn { .. } => ErrorSeverity::Validation,
            Self::Domain(err) => err.severity(),
            Self::Bands(err) => err.severity(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NotOngoing { .. } => ErrorCategory::InvariantViolation,
            Self::OutOfTurn { .. } => ErrorCategory::DomainValidation,
            Self::Domain(err) => err.category(),
            Self::Bands(err) => err.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotOngoing { .. } => "SESSION_NOT_ONGOING",
            Self::OutOfTurn { .. } => "SESSION_OUT_OF_TURN",
            Self::Domain(err) => err.error_code(),
            Self::Bands(err) => err.error_code(),
        }
    }
}

/// Errors raised by [`super::SessionRegistry`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown session {session}")]
    UnknownSession { session: SessionId },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownSession { .. } => ErrorSeverity::Validation,
            Self::Session(err) => err.severity(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSession { .. } => ErrorCategory::DomainValidation,
            Self::Session(err) => err.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSession { .. } => "REGISTRY_UNKNOWN_SESSION",
            Self::Session(err) => err.error_code(),
        }
    }
}
