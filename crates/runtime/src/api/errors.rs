//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the session registry and the
//! enemy tap provider so clients can bubble them up with consistent context.
//! Narrative and analytics failures never leave the commentary coordinator
//! and its log writer.

use combat_core::{ErrorCategory, ErrorSeverity, GameError, RegistryError, SessionId};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{session} already has a mutation in flight")]
    ConcurrencyConflict { session: SessionId },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("enemy tap provider not set")]
    TapProviderNotSet,

    #[error("enemy tap provider failed: {0}")]
    TapProvider(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConcurrencyConflict { .. } => ErrorSeverity::Recoverable,
            Self::Registry(err) => err.severity(),
            Self::TapProviderNotSet => ErrorSeverity::Validation,
            Self::TapProvider(_) => ErrorSeverity::Internal,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ConcurrencyConflict { .. } => ErrorCategory::ConcurrencyConflict,
            Self::Registry(err) => err.category(),
            Self::TapProviderNotSet => ErrorCategory::DomainValidation,
            Self::TapProvider(_) => ErrorCategory::ExternalServiceFailure,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorCategory::InvariantViolation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::ConcurrencyConflict { .. } => "RUNTIME_CONCURRENCY_CONFLICT",
            Self::Registry(err) => err.error_code(),
            Self::TapProviderNotSet => "RUNTIME_TAP_PROVIDER_NOT_SET",
            Self::TapProvider(_) => "RUNTIME_TAP_PROVIDER",
        }
    }
}
