//! # Validation Module
//!
//! Business-rule validation for purchase requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Suite collaborator (request validation module)               │
//! │  ├── Structural checks (types, presence, non-empty lines)              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (business rules)                                 │
//! │  ├── Header totals sane, remainder computable                          │
//! │  ├── Line quantity/price/discount ranges                               │
//! │  └── Line totals reconcile with the declared net total                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{PurchaseLine, PurchaseRequest};
use crate::{MAX_BILL_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Header Validators
// =============================================================================

/// Validates the monetary header of a purchase request.
///
/// ## Rules
/// - `cashier_id` must be non-empty
/// - `lines` must be non-empty and within [`MAX_BILL_LINES`]
/// - `total_cents` must be at least 1
/// - every other monetary field must be non-negative
pub fn validate_bill_header(request: &PurchaseRequest) -> ValidationResult<()> {
    if request.cashier_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cashier_id".to_string(),
        });
    }

    if request.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    if request.lines.len() > MAX_BILL_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_BILL_LINES as i64,
        });
    }

    if request.total_cents < 1 {
        return Err(ValidationError::MustBePositive {
            field: "total_amount".to_string(),
        });
    }

    for (field, value) in [
        ("net_total", request.net_total_cents),
        ("total_discount_amount", request.discount_cents),
        ("amount_received", request.received_cents),
    ] {
        if value < 0 {
            return Err(ValidationError::MustBeNonNegative {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

/// Verifies that the declared totals hold together:
/// the sum of line nets matches `net_total`, and
/// `total == net_total − total_discount`.
///
/// ## Tolerance
/// Integer-cents arithmetic is exact, so the default tolerance is zero.
/// A non-zero tolerance accommodates upstream collaborators that round
/// per-line before declaring the totals.
pub fn reconcile_totals(request: &PurchaseRequest, tolerance_cents: i64) -> ValidationResult<()> {
    let computed: i128 = request.lines.iter().map(PurchaseLine::net_cents).sum();
    let declared = request.net_total_cents as i128;

    if (computed - declared).abs() > tolerance_cents as i128 {
        return Err(ValidationError::TotalsMismatch {
            declared_cents: request.net_total_cents,
            computed_cents: computed.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            tolerance_cents,
        });
    }

    let payable = request.net_total_cents as i128 - request.discount_cents as i128;
    if (payable - request.total_cents as i128).abs() > tolerance_cents as i128 {
        return Err(ValidationError::TotalsMismatch {
            declared_cents: request.total_cents,
            computed_cents: payable.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            tolerance_cents,
        });
    }

    Ok(())
}

// =============================================================================
// Line Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a line's unit price in cents.
///
/// ## Rules
/// - Must be strictly positive; free dispensing goes through a different
///   suite module, not the point-of-sale
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a line discount in cents.
///
/// ## Rules
/// - Must be non-negative
/// - May not exceed the line gross (a discount cannot flip a line negative)
pub fn validate_line_discount(discount_cents: i64, qty: i64, price_cents: i64) -> ValidationResult<()> {
    if discount_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount_amount".to_string(),
        });
    }

    let gross = qty as i128 * price_cents as i128;
    if discount_cents as i128 > gross {
        return Err(ValidationError::OutOfRange {
            field: "discount_amount".to_string(),
            min: 0,
            max: gross.clamp(0, i64::MAX as i128) as i64,
        });
    }

    Ok(())
}

/// Validates one purchase line in full.
pub fn validate_line(line: &PurchaseLine) -> ValidationResult<()> {
    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price_cents)?;
    validate_line_discount(line.discount_cents, line.quantity, line.unit_price_cents)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lines: Vec<PurchaseLine>) -> PurchaseRequest {
        let net: i128 = lines.iter().map(PurchaseLine::net_cents).sum();
        PurchaseRequest {
            cashier_id: "cashier-7".to_string(),
            customer: None,
            net_total_cents: net as i64,
            total_cents: net as i64,
            discount_cents: 0,
            received_cents: net as i64,
            lines,
        }
    }

    fn line(qty: i64, price: i64, discount: i64) -> PurchaseLine {
        PurchaseLine {
            product_id: "p-1".to_string(),
            quantity: qty,
            unit_price_cents: price,
            discount_cents: discount,
        }
    }

    #[test]
    fn test_validate_bill_header() {
        assert!(validate_bill_header(&request(vec![line(2, 500, 0)])).is_ok());

        let mut bad = request(vec![line(2, 500, 0)]);
        bad.cashier_id = "  ".to_string();
        assert!(validate_bill_header(&bad).is_err());

        let mut bad = request(vec![line(2, 500, 0)]);
        bad.lines.clear();
        assert!(validate_bill_header(&bad).is_err());

        let mut bad = request(vec![line(2, 500, 0)]);
        bad.total_cents = 0;
        assert!(validate_bill_header(&bad).is_err());

        let mut bad = request(vec![line(2, 500, 0)]);
        bad.received_cents = -1;
        assert!(validate_bill_header(&bad).is_err());
    }

    #[test]
    fn test_reconcile_totals() {
        let req = request(vec![line(2, 500, 100), line(1, 250, 0)]);
        assert!(reconcile_totals(&req, 0).is_ok());

        let mut skewed = request(vec![line(2, 500, 0)]);
        skewed.net_total_cents += 1;
        skewed.total_cents += 1;
        assert!(reconcile_totals(&skewed, 0).is_err());
        // Within tolerance the same skew passes
        assert!(reconcile_totals(&skewed, 1).is_ok());
    }

    #[test]
    fn test_reconcile_totals_checks_discount_identity() {
        let mut req = request(vec![line(2, 500, 0)]);
        req.discount_cents = 100;
        // total still equals net: identity broken
        assert!(reconcile_totals(&req, 0).is_err());

        req.total_cents = 900;
        assert!(reconcile_totals(&req, 0).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(1).is_ok());
        assert!(validate_unit_price(0).is_err());
        assert!(validate_unit_price(-100).is_err());
    }

    #[test]
    fn test_validate_line_discount() {
        assert!(validate_line_discount(0, 2, 500).is_ok());
        assert!(validate_line_discount(1000, 2, 500).is_ok()); // exactly the gross
        assert!(validate_line_discount(1001, 2, 500).is_err());
        assert!(validate_line_discount(-1, 2, 500).is_err());
    }

    #[test]
    fn test_validate_line() {
        assert!(validate_line(&line(3, 250, 50)).is_ok());
        assert!(validate_line(&line(0, 250, 0)).is_err());
        assert!(validate_line(&line(3, 0, 0)).is_err());
        assert!(validate_line(&line(3, 250, -1)).is_err());
    }
}
