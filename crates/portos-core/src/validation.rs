//! # Validation Module
//!
//! Client-side form validation. Every form-backed API call runs these checks
//! first, so a malformed pincode or a mismatched password never leaves the
//! machine.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types: ids are integers, ratings are u8                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  └── Formats: 6-digit pincode, 10-digit phone, email                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storefront API                                               │
//! │  └── Authoritative checks (stock, ownership, duplicate usernames)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use portos_core::validation::{validate_pincode, validate_phone};
//!
//! assert!(validate_pincode("411001").is_ok());
//! assert!(validate_phone("98765").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AddressPatch, Credentials, NewAddress, NewReview, Registration};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest review comment accepted.
pub const MAX_REVIEW_LENGTH: usize = 1000;

/// Longest product search term accepted.
pub const MAX_SEARCH_LENGTH: usize = 100;

// =============================================================================
// Field Validators
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn exact_digits(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    let value = value.trim();
    required(field, value)?;
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be exactly {len} digits"),
        });
    }
    Ok(())
}

/// Validates an Indian postal code: exactly six digits.
///
/// ```rust
/// use portos_core::validation::validate_pincode;
///
/// assert!(validate_pincode("560001").is_ok());
/// assert!(validate_pincode("56000").is_err());
/// assert!(validate_pincode("56000A").is_err());
/// ```
pub fn validate_pincode(pincode: &str) -> ValidationResult<()> {
    exact_digits("pincode", pincode, 6)
}

/// Validates a mobile number: exactly ten digits, no country code.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    exact_digits("phone", phone, 10)
}

/// Validates a username.
///
/// ## Rules
/// - 3 to 50 characters
/// - Letters, digits, `_`, `.` and `-` only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();
    required("username", username)?;

    if username.chars().count() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }
    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, '_', '.' and '-'".to_string(),
        });
    }
    Ok(())
}

/// Validates an email address: one `@`, a non-empty local part and a dotted
/// domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let dotted = domain
        .split('.')
        .collect::<Vec<_>>();
    if dotted.len() < 2 || dotted.iter().any(|part| part.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }
    Ok(())
}

/// Validates an add-to-cart quantity.
///
/// ```rust
/// use portos_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 || quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.trim().chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }
    Ok(())
}

/// Validates a price filter. Either bound may be absent.
pub fn validate_price_range(min: Option<Money>, max: Option<Money>) -> ValidationResult<()> {
    for (field, bound) in [("min_price", min), ("max_price", max)] {
        if bound.is_some_and(|m| m.is_negative()) {
            return Err(ValidationError::MustBePositive {
                field: field.to_string(),
            });
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::InvalidFormat {
                field: "price range".to_string(),
                reason: "minimum price cannot exceed maximum price".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the add/edit address form.
///
/// Returns the first failing field, in form order.
pub fn validate_address(address: &NewAddress) -> ValidationResult<()> {
    required("name", &address.name)?;
    required("address", &address.address)?;
    required("city", &address.city)?;
    required("state", &address.state)?;
    validate_pincode(&address.pincode)?;
    validate_phone(&address.phone)?;
    Ok(())
}

/// Validates only the fields a patch sets.
pub fn validate_address_patch(patch: &AddressPatch) -> ValidationResult<()> {
    for (field, value) in [
        ("name", &patch.name),
        ("address", &patch.address),
        ("city", &patch.city),
        ("state", &patch.state),
    ] {
        if let Some(value) = value {
            required(field, value)?;
        }
    }
    if let Some(pincode) = &patch.pincode {
        validate_pincode(pincode)?;
    }
    if let Some(phone) = &patch.phone {
        validate_phone(phone)?;
    }
    Ok(())
}

/// Validates the registration form, including the confirmation field that
/// is never sent to the server.
pub fn validate_registration(form: &Registration, confirm_password: &str) -> ValidationResult<()> {
    validate_username(&form.username)?;
    validate_email(&form.email)?;
    validate_password(&form.password)?;
    if form.password != confirm_password {
        return Err(ValidationError::Mismatch {
            field: "password confirmation".to_string(),
        });
    }
    Ok(())
}

pub fn validate_login(form: &Credentials) -> ValidationResult<()> {
    required("username", &form.username)?;
    if form.password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_review(review: &NewReview) -> ValidationResult<()> {
    for (field, id) in [("order_id", review.order_id), ("product_id", review.product_id)] {
        if id <= 0 {
            return Err(ValidationError::MustBePositive {
                field: field.to_string(),
            });
        }
    }
    if !(1..=5).contains(&review.rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }
    required("comment", &review.comment)?;
    if review.comment.chars().count() > MAX_REVIEW_LENGTH {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_REVIEW_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
