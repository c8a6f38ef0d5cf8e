//! # Error Types
//!
//! Domain-specific error types for medipos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medipos-core errors (this file)                                       │
//! │  └── ValidationError  - Business-rule validation failures              │
//! │                                                                         │
//! │  medipos-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  medipos-engine errors (separate crate)                                │
//! │  └── PurchaseError    - Caller-facing purchase taxonomy                │
//! │                                                                         │
//! │  Flow: ValidationError → PurchaseError ← DbError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, limits)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

/// Business-rule validation errors.
///
/// These errors occur when a request does not meet the engine's business
/// rules. Structural validation (types, presence) is the responsibility of
/// an upstream collaborator; these are the rules the engine itself owns.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Declared bill totals do not match the sum of its lines.
    #[error(
        "declared net total {declared_cents} does not match line total \
         {computed_cents} (tolerance {tolerance_cents})"
    )]
    TotalsMismatch {
        declared_cents: i64,
        computed_cents: i64,
        tolerance_cents: i64,
    },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
