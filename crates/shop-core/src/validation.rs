//! Local request checks, run before anything leaves the process.

use crate::checkout::CheckoutRequest;
use crate::error::ValidationError;

/// Largest quantity accepted for a single cart entry
pub const MAX_QUANTITY: u32 = 999_999;

/// Basic email shape: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Check top-level presence, email shape, and per-item fields.
///
/// Prices are not checked here; they are resolved while building line items
/// and bounded by [`crate::product::MAX_UNIT_AMOUNT`].
pub fn validate_request(request: &CheckoutRequest) -> Result<(), ValidationError> {
    if request.items.is_empty() || request.customer_email.trim().is_empty() {
        return Err(ValidationError::MissingParameters);
    }

    if !is_valid_email(request.customer_email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }

    for (position, item) in request.items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(ValidationError::MissingItemId { position });
        }
        if item.quantity == 0 || item.quantity > MAX_QUANTITY {
            return Err(ValidationError::InvalidQuantity {
                item_id: item.id.clone(),
            });
        }
    }

    Ok(())
}
