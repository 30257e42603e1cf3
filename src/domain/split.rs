use super::errors::DomainError;
use super::order::PaymentMethod;

/// Smallest amount the gateway will authorize on a card.
pub const MIN_CARD_AMOUNT: i64 = 100;

/// How the order total is divided between the card charge and the point
/// redemption. Produced only by [`compute_split`], so the sum always equals
/// the total it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSplit {
    pub card_amount: i64,
    pub point_amount: i64,
}

/// Pure split computation. `requested_points` is what the client asked to
/// redeem (ignored for CARD, must equal the total's worth for POINT), and
/// `balance` is the member's current point balance.
pub fn compute_split(
    total: i64,
    method: PaymentMethod,
    requested_points: i64,
    balance: i64,
) -> Result<PaymentSplit, DomainError> {
    match method {
        PaymentMethod::Card => Ok(PaymentSplit {
            card_amount: total,
            point_amount: 0,
        }),
        PaymentMethod::Point => {
            if balance < total {
                return Err(DomainError::InsufficientBalance);
            }
            Ok(PaymentSplit {
                card_amount: 0,
                point_amount: total,
            })
        }
        PaymentMethod::Mixed => {
            if requested_points <= 0 {
                return Err(DomainError::validation(
                    "pointAmount",
                    "Mixed payment requires a positive point amount",
                ));
            }
            if requested_points > balance {
                return Err(DomainError::InsufficientBalance);
            }
            if requested_points > total {
                return Err(DomainError::validation(
                    "pointAmount",
                    "Point amount cannot exceed the order total",
                ));
            }
            let card_amount = total - requested_points;
            if card_amount < MIN_CARD_AMOUNT {
                return Err(DomainError::validation(
                    "pointAmount",
                    format!("Card amount must be at least {MIN_CARD_AMOUNT}"),
                ));
            }
            Ok(PaymentSplit {
                card_amount,
                point_amount: requested_points,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_takes_full_total_regardless_of_points() {
        let split = compute_split(20_000, PaymentMethod::Card, 5_000, 100).unwrap();
        assert_eq!(split.card_amount, 20_000);
        assert_eq!(split.point_amount, 0);
    }

    #[test]
    fn point_requires_full_coverage() {
        let split = compute_split(5_000, PaymentMethod::Point, 5_000, 5_000).unwrap();
        assert_eq!(split.card_amount, 0);
        assert_eq!(split.point_amount, 5_000);

        assert!(matches!(
            compute_split(5_000, PaymentMethod::Point, 5_000, 3_000),
            Err(DomainError::InsufficientBalance)
        ));
    }

    #[test]
    fn mixed_sum_equals_total() {
        let split = compute_split(10_000, PaymentMethod::Mixed, 4_000, 9_000).unwrap();
        assert_eq!(split.card_amount + split.point_amount, 10_000);
        assert!(split.card_amount >= MIN_CARD_AMOUNT);
    }

    #[test]
    fn mixed_rejects_card_amount_below_minimum() {
        // 10,000 - 9,950 = 50 < 100
        let err = compute_split(10_000, PaymentMethod::Mixed, 9_950, 20_000).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation { field: "pointAmount", .. }
        ));
    }

    #[test]
    fn mixed_rejects_zero_or_negative_points() {
        assert!(compute_split(10_000, PaymentMethod::Mixed, 0, 5_000).is_err());
        assert!(compute_split(10_000, PaymentMethod::Mixed, -5, 5_000).is_err());
    }

    #[test]
    fn mixed_rejects_points_beyond_balance_or_total() {
        assert!(matches!(
            compute_split(10_000, PaymentMethod::Mixed, 6_000, 5_000),
            Err(DomainError::InsufficientBalance)
        ));
        assert!(matches!(
            compute_split(10_000, PaymentMethod::Mixed, 10_001, 50_000),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn mixed_accepts_exact_minimum_card_amount() {
        let split = compute_split(10_000, PaymentMethod::Mixed, 9_900, 20_000).unwrap();
        assert_eq!(split.card_amount, MIN_CARD_AMOUNT);
    }
}
