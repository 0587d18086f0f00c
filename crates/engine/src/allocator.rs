//! FIFO allocation of an incoming amount over open receivables.

use uuid::Uuid;

use crate::{Money, receivables::OpenReceivable};

/// One receivable's share of an allocated amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub receivable_id: Uuid,
    pub trip_id: Uuid,
    pub amount: Money,
}

/// Splits `amount` over `receivables` in their given order, filling each up
/// to its remaining balance before moving on.
///
/// Receivables must already be in settlement order (see
/// [`crate::receivables::sort_fifo`]). Any part of `amount` left after every
/// receivable is full is dropped; callers account for the full incoming
/// amount on the funding side regardless.
pub fn allocate(amount: Money, receivables: &[OpenReceivable]) -> Vec<Allocation> {
    let mut left = amount;
    let mut allocations = Vec::new();
    for receivable in receivables {
        if left.is_zero() || !left.is_positive() {
            break;
        }
        let share = left.min(receivable.remaining());
        if !share.is_positive() {
            continue;
        }
        allocations.push(Allocation {
            receivable_id: receivable.id,
            trip_id: receivable.trip_id,
            amount: share,
        });
        left -= share;
    }
    allocations
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn receivable(payable: i64, paid: i64) -> OpenReceivable {
        OpenReceivable {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            start_date: Utc::now(),
            payable: Money::new(payable),
            paid: Money::new(paid),
        }
    }

    #[test]
    fn fills_in_order_and_conserves_the_amount() {
        let receivables = vec![receivable(50, 0), receivable(30, 0), receivable(20, 0)];
        let allocations = allocate(Money::new(60), &receivables);

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].amount, Money::new(50));
        assert_eq!(allocations[1].amount, Money::new(10));
        let total: Money = allocations.iter().map(|a| a.amount).sum();
        assert_eq!(total, Money::new(60));
    }

    #[test]
    fn drops_the_remainder_when_everything_is_full() {
        let receivables = vec![receivable(50, 0)];
        let allocations = allocate(Money::new(80), &receivables);

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].amount, Money::new(50));
    }

    #[test]
    fn skips_fully_paid_receivables() {
        let receivables = vec![receivable(50, 50), receivable(30, 0)];
        let allocations = allocate(Money::new(20), &receivables);

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].receivable_id, receivables[1].id);
        assert_eq!(allocations[0].amount, Money::new(20));
    }

    #[test]
    fn zero_amount_allocates_nothing() {
        let receivables = vec![receivable(50, 0)];
        assert!(allocate(Money::ZERO, &receivables).is_empty());
    }
}
