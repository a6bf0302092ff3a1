//! # Error Types
//!
//! Domain-specific error types for portos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  portos-core errors (this file)                                        │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Form input failures (blocked before sending)   │
//! │                                                                         │
//! │  portos-client errors (separate crate)                                 │
//! │  └── ClientError      - Transport, 401, 404, API rejections            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ApiResponse         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each variant maps to a message a form can show inline.

use thiserror::Error;

use crate::types::Id;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart line is not in the local cart.
    #[error("Cart item not found: {0}")]
    ItemNotInCart(Id),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The address is not one of the user's saved addresses.
    #[error("Address not found: {0}")]
    UnknownAddress(Id),

    /// Checkout was attempted without choosing an address.
    #[error("Please select a delivery address")]
    NoDeliveryAddress,

    /// Checkout was attempted with nothing to buy.
    #[error("Your cart is empty")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before a request is built, so a malformed pincode never
/// reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (pincode, phone, email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not (password confirmation).
    #[error("{field} does not match")]
    Mismatch { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field, for highlighting a form input.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );
        assert_eq!(
            CoreError::NoDeliveryAddress.to_string(),
            "Please select a delivery address"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "city".to_string(),
        };
        assert_eq!(err.to_string(), "city is required");
        assert_eq!(err.field(), "city");

        let err = ValidationError::Mismatch {
            field: "password confirmation".to_string(),
        };
        assert_eq!(err.to_string(), "password confirmation does not match");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "pincode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
