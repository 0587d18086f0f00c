use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success body for create-style endpoints: a message plus any generated id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    pub id: Uuid,
}

/// Success body for endpoints that only acknowledge.
#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledged {
    pub message: String,
}

/// Failure body: a human-readable message plus the underlying error text.
#[derive(Debug, Serialize, Deserialize)]
pub struct Failure {
    pub message: String,
    pub error: String,
}

/// Where a movement is funded from (or, for recoveries, where it lands).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Funding {
    Bank(Uuid),
    Cash,
    Depot(Uuid),
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Opening balance in minor units (paise).
        pub opening_balance: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub balance: i64,
    }
}

pub mod depot {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepotNew {
        pub name: String,
        /// Seed pool balance in minor units; may be negative.
        pub seed_balance: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepotView {
        pub id: Uuid,
        pub name: String,
        pub balance: i64,
    }
}

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub start_date: DateTime<Utc>,
        /// Fuel loaded for the trip, in litres.
        pub fuel_assigned: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripDepotNew {
        pub depot_id: Uuid,
        pub payable_amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientTripNew {
        pub client_ref: String,
        pub total_amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelSold {
        pub fuel_sold: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub start_date: DateTime<Utc>,
        pub status: String,
        pub paid: i64,
        pub amount_collected: i64,
        pub fuel_assigned: i64,
        pub fuel_sold: i64,
        pub completed_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceivableView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub payable: i64,
        pub paid: i64,
        pub remaining: i64,
    }
}

pub mod movement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub funding: Funding,
        /// Amount in minor units; must be positive.
        pub amount: i64,
        pub category: Option<String>,
        pub depot_id: Option<Uuid>,
        pub trip_id: Option<Uuid>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleMovementNew {
        pub funding: Funding,
        pub amount: i64,
        pub vehicle_ref: String,
        pub category: Option<String>,
        pub trip_id: Option<Uuid>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub funding: Funding,
        pub depot_id: Uuid,
        pub amount: i64,
        pub payment_mode: Option<String>,
        pub reference_no: Option<String>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecoveryNew {
        pub funding: Funding,
        pub client_ref: String,
        pub amount: i64,
        pub payment_mode: Option<String>,
        pub reference_no: Option<String>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    /// Ids created by a recorded movement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementCreated {
        pub message: String,
        pub id: Uuid,
        pub transaction_ids: Vec<Uuid>,
        pub ledger_entry_ids: Vec<Uuid>,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub id: Uuid,
        pub debit: i64,
        pub credit: i64,
        pub running_balance: i64,
        pub occurred_at: DateTime<Utc>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerView {
        pub owner_id: String,
        pub balance: i64,
        pub entries: Vec<LedgerEntryView>,
    }
}
