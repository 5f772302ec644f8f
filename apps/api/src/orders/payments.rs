//! Payment summary arithmetic for an order.

use serde::{Deserialize, Serialize};

use crate::models::order::PaymentRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
    Overpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Agreed order price, minor units.
    pub total_price: i64,
    /// Sum of recorded payments, minor units.
    pub paid: i64,
    /// `total_price - paid`; negative when overpaid.
    pub balance: i64,
    pub status: PaymentStatus,
}

/// Derives the summary from the agreed price and the recorded payments.
/// A zero-price order with no payments owes nothing and reads as Paid.
pub fn summarize(total_price: i64, payments: &[PaymentRow]) -> PaymentSummary {
    let paid: i64 = payments.iter().map(|p| p.amount).sum();
    let balance = total_price - paid;

    let status = if balance < 0 {
        PaymentStatus::Overpaid
    } else if balance == 0 {
        PaymentStatus::Paid
    } else if paid == 0 {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Partial
    };

    PaymentSummary {
        total_price,
        paid,
        balance,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::PaymentMethod;
    use chrono::Utc;
    use uuid::Uuid;

    fn payment(amount: i64) -> PaymentRow {
        PaymentRow {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            amount,
            method: PaymentMethod::Cash,
            note: None,
            paid_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_payments_is_unpaid() {
        let s = summarize(10_000, &[]);
        assert_eq!(s.status, PaymentStatus::Unpaid);
        assert_eq!(s.balance, 10_000);
    }

    #[test]
    fn test_partial_payment() {
        let s = summarize(10_000, &[payment(4_000)]);
        assert_eq!(s.status, PaymentStatus::Partial);
        assert_eq!(s.paid, 4_000);
        assert_eq!(s.balance, 6_000);
    }

    #[test]
    fn test_exact_payment_across_installments() {
        let s = summarize(10_000, &[payment(4_000), payment(6_000)]);
        assert_eq!(s.status, PaymentStatus::Paid);
        assert_eq!(s.balance, 0);
    }

    #[test]
    fn test_overpaid_negative_balance() {
        let s = summarize(10_000, &[payment(12_000)]);
        assert_eq!(s.status, PaymentStatus::Overpaid);
        assert_eq!(s.balance, -2_000);
    }

    #[test]
    fn test_zero_price_no_payments_is_paid() {
        let s = summarize(0, &[]);
        assert_eq!(s.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_zero_price_with_payment_is_overpaid() {
        let s = summarize(0, &[payment(1)]);
        assert_eq!(s.status, PaymentStatus::Overpaid);
    }
}
