//! Receivable ordering for FIFO settlement.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Money;

/// A receivable with an outstanding balance, lifted out of its source row
/// (trip×depot or trip×client) for allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenReceivable {
    /// Id of the underlying trip_depos / client_trips row.
    pub id: Uuid,
    pub trip_id: Uuid,
    /// Start date of the owning trip, the primary FIFO key.
    pub start_date: DateTime<Utc>,
    pub payable: Money,
    pub paid: Money,
}

impl OpenReceivable {
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.payable - self.paid
    }
}

/// Sorts receivables into settlement order: oldest trip first, ties broken
/// by trip id so the order is total and stable across runs.
pub fn sort_fifo(receivables: &mut [OpenReceivable]) {
    receivables.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.trip_id.cmp(&b.trip_id))
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn receivable(start_date: DateTime<Utc>, trip_id: Uuid) -> OpenReceivable {
        OpenReceivable {
            id: Uuid::new_v4(),
            trip_id,
            start_date,
            payable: Money::new(100),
            paid: Money::ZERO,
        }
    }

    #[test]
    fn orders_by_start_date_then_trip_id() {
        let jan = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let low = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        let high = Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap();

        let mut receivables = vec![
            receivable(feb, low),
            receivable(jan, high),
            receivable(jan, low),
        ];
        sort_fifo(&mut receivables);

        assert_eq!(receivables[0].start_date, jan);
        assert_eq!(receivables[0].trip_id, low);
        assert_eq!(receivables[1].start_date, jan);
        assert_eq!(receivables[1].trip_id, high);
        assert_eq!(receivables[2].start_date, feb);
    }
}
