//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`BandError`, `SessionError`, ...) live next to the
//! code that raises them. This module provides the shared classification
//! used by every one of them, plus [`DomainError`] for rejected inputs.
//!
//! # Design Principles
//!
//! - **Type Safety**: each subsystem has its own error enum
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Fail before mutation**: every error here is raised before state changes

use crate::session::Side;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retrying later (or after another call finishes) may succeed.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - a rules invariant is broken; the operation cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Failure taxonomy shared by the core and the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// A rules invariant was violated. Logged, never auto-corrected.
    InvariantViolation,
    /// Input outside its domain, rejected before any mutation.
    DomainValidation,
    /// A collaborator (narrative service, ...) failed. Never fatal to combat.
    ExternalServiceFailure,
    /// Overlapping mutation of the same session.
    ConcurrencyConflict,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvariantViolation => "invariant_violation",
            Self::DomainValidation => "domain_validation",
            Self::ExternalServiceFailure => "external_service_failure",
            Self::ConcurrencyConflict => "concurrency_conflict",
        }
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn category(&self) -> ErrorCategory;

    /// Stable identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Inputs rejected before they reach the rules.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DomainError {
    #[error("angle {angle} is outside [0, 360)")]
    AngleOutOfRange { angle: f64 },

    #[error("accuracy {value} is outside [{min}, {max}]")]
    AccuracyOutOfRange { value: u32, min: u32, max: u32 },

    #[error("damage scaling {value} must be finite and non-negative")]
    InvalidScaling { value: f64 },

    #[error("{side} max HP must be positive")]
    InvalidMaxHp { side: Side },
}

impl GameError for DomainError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::DomainValidation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AngleOutOfRange { .. } => "DOMAIN_ANGLE_OUT_OF_RANGE",
            Self::AccuracyOutOfRange { .. } => "DOMAIN_ACCURACY_OUT_OF_RANGE",
            Self::InvalidScaling { .. } => "DOMAIN_INVALID_SCALING",
            Self::InvalidMaxHp { .. } => "DOMAIN_INVALID_MAX_HP",
        }
    }
}
