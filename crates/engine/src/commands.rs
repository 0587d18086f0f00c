//! Command structs for engine operations.
//!
//! These types group parameters for write operations (expenses, depot
//! payments, client recoveries), keeping call sites readable and avoiding
//! long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Money;

/// Where the money for a movement comes from (or, for a depot-direct
/// recovery, where it lands).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingSource {
    /// A bank account's BANK ledger.
    Bank(Uuid),
    /// The single shared cash-in-hand ledger.
    Cash,
    /// A depot's POOL ledger; only valid for recoveries.
    Depot(Uuid),
}

/// Common metadata for money movements.
#[derive(Clone, Debug)]
pub struct TxMeta {
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TxMeta {
    #[must_use]
    pub fn new(occurred_at: DateTime<Utc>) -> Self {
        Self {
            payment_mode: None,
            reference_no: None,
            note: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.payment_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn reference_no(mut self, reference: impl Into<String>) -> Self {
        self.reference_no = Some(reference.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Record a general expense.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub source: FundingSource,
    pub amount: Money,
    pub category: Option<String>,
    pub depot_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    pub meta: TxMeta,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(source: FundingSource, amount: Money, occurred_at: DateTime<Utc>) -> Self {
        Self {
            source,
            amount,
            category: None,
            depot_id: None,
            trip_id: None,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn depot_id(mut self, depot_id: Uuid) -> Self {
        self.depot_id = Some(depot_id);
        self
    }

    #[must_use]
    pub fn trip_id(mut self, trip_id: Uuid) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: TxMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Pay a depot, settling its open trip receivables oldest-first.
#[derive(Clone, Debug)]
pub struct PaymentToDepotCmd {
    pub source: FundingSource,
    pub depot_id: Uuid,
    pub amount: Money,
    pub meta: TxMeta,
}

impl PaymentToDepotCmd {
    #[must_use]
    pub fn new(
        source: FundingSource,
        depot_id: Uuid,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            depot_id,
            amount,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn meta(mut self, meta: TxMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.meta.payment_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn reference_no(mut self, reference: impl Into<String>) -> Self {
        self.meta.reference_no = Some(reference.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Record money recovered from a client, settling the client's open trip
/// receivables oldest-first.
///
/// `destination` says where the money lands: a bank account, cash in hand,
/// or directly at a depot (pool ledger only, no transaction row).
#[derive(Clone, Debug)]
pub struct RecoveryCmd {
    pub destination: FundingSource,
    pub client_ref: String,
    pub amount: Money,
    pub meta: TxMeta,
}

impl RecoveryCmd {
    #[must_use]
    pub fn new(
        destination: FundingSource,
        client_ref: impl Into<String>,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            destination,
            client_ref: client_ref.into(),
            amount,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn meta(mut self, meta: TxMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.meta.payment_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn reference_no(mut self, reference: impl Into<String>) -> Self {
        self.meta.reference_no = Some(reference.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Record rent paid for a hired vehicle.
#[derive(Clone, Debug)]
pub struct VehicleRentCmd {
    pub source: FundingSource,
    pub amount: Money,
    pub vehicle_ref: String,
    pub trip_id: Option<Uuid>,
    pub meta: TxMeta,
}

impl VehicleRentCmd {
    #[must_use]
    pub fn new(
        source: FundingSource,
        vehicle_ref: impl Into<String>,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            amount,
            vehicle_ref: vehicle_ref.into(),
            trip_id: None,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn trip_id(mut self, trip_id: Uuid) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Record a vehicle running cost (fuel, maintenance, tolls).
#[derive(Clone, Debug)]
pub struct VehicleExpenseCmd {
    pub source: FundingSource,
    pub amount: Money,
    pub vehicle_ref: String,
    pub category: Option<String>,
    pub trip_id: Option<Uuid>,
    pub meta: TxMeta,
}

impl VehicleExpenseCmd {
    #[must_use]
    pub fn new(
        source: FundingSource,
        vehicle_ref: impl Into<String>,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            amount,
            vehicle_ref: vehicle_ref.into(),
            category: None,
            trip_id: None,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn trip_id(mut self, trip_id: Uuid) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}
