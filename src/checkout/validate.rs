//! Stock sufficiency validation
//!
//! Pure and deterministic. Shared by the advisory `in_stock` flag on the
//! cart view and the authoritative checkout-time check, so the two call
//! sites can never drift apart.

use rust_decimal::Decimal;

/// A cart line joined with the product state read in the same transaction
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub stock: i32,
}

/// First stock violation found in a cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insufficient {
    pub product_id: i64,
    pub name: String,
    pub available: i32,
}

/// Whether a requested quantity can be served from the given stock
pub fn sufficient(requested: i32, stock: i32) -> bool {
    requested <= stock
}

/// Check every line, reporting the first violating product.
///
/// Short-circuits on the first violation rather than collecting all of
/// them; callers retry after fixing one line at a time anyway.
pub fn validate(lines: &[CartLine]) -> Result<(), Insufficient> {
    for line in lines {
        if !sufficient(line.quantity, line.stock) {
            return Err(Insufficient {
                product_id: line.product_id,
                name: line.name.clone(),
                available: line.stock,
            });
        }
    }
    Ok(())
}

/// Order total over the lines as read inside the transaction:
/// `Σ unit_price × quantity`
pub fn order_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i32, unit_price: Decimal, stock: i32) -> CartLine {
        CartLine {
            product_id,
            name: format!("product-{product_id}"),
            quantity,
            unit_price,
            stock,
        }
    }

    #[test]
    fn sufficient_boundary() {
        assert!(sufficient(5, 5));
        assert!(sufficient(0, 0));
        assert!(!sufficient(6, 5));
        assert!(!sufficient(1, 0));
    }

    #[test]
    fn all_lines_within_stock_pass() {
        let lines = vec![
            line(7, 2, Decimal::new(350, 2), 5),
            line(9, 1, Decimal::new(125, 2), 1),
        ];
        assert!(validate(&lines).is_ok());
    }

    #[test]
    fn first_violation_wins() {
        let lines = vec![
            line(1, 1, Decimal::new(200, 2), 10),
            line(7, 10, Decimal::new(350, 2), 5),
            line(9, 99, Decimal::new(100, 2), 0),
        ];
        let err = validate(&lines).unwrap_err();
        assert_eq!(err.product_id, 7);
        assert_eq!(err.available, 5);
    }

    #[test]
    fn empty_cart_validates_trivially() {
        assert!(validate(&[]).is_ok());
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_uses_exact_decimal_arithmetic() {
        // 2 x 3.50 = 7.00
        let lines = vec![line(7, 2, Decimal::new(350, 2), 5)];
        assert_eq!(order_total(&lines), Decimal::new(700, 2));

        // classic float trap: 3 x 0.10 must be exactly 0.30
        let lines = vec![line(1, 3, Decimal::new(10, 2), 10)];
        assert_eq!(order_total(&lines), Decimal::new(30, 2));
    }

    #[test]
    fn total_sums_across_lines() {
        let lines = vec![
            line(1, 2, Decimal::new(150, 2), 5),
            line(2, 1, Decimal::new(425, 2), 5),
            line(3, 4, Decimal::new(75, 2), 5),
        ];
        assert_eq!(order_total(&lines), Decimal::new(1025, 2));
    }
}
