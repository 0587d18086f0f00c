//! Money-movement records.
//!
//! A `Transaction` is the auditable record of one movement through a bank or
//! cash funding source. Every transaction is mirrored by a ledger entry on
//! its funding ledger; depot-direct recoveries touch only the pool ledger and
//! therefore produce no transaction row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Why money moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPurpose {
    Expense,
    PaymentToDepot,
    RecoveryFromClient,
    VehicleRent,
    VehicleExpense,
}

impl TransactionPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::PaymentToDepot => "payment_to_depot",
            Self::RecoveryFromClient => "recovery_from_client",
            Self::VehicleRent => "vehicle_rent",
            Self::VehicleExpense => "vehicle_expense",
        }
    }

    /// `true` for purposes that take money out of the funding source.
    #[must_use]
    pub fn is_outgoing(self) -> bool {
        !matches!(self, Self::RecoveryFromClient)
    }
}

impl TryFrom<&str> for TransactionPurpose {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "payment_to_depot" => Ok(Self::PaymentToDepot),
            "recovery_from_client" => Ok(Self::RecoveryFromClient),
            "vehicle_rent" => Ok(Self::VehicleRent),
            "vehicle_expense" => Ok(Self::VehicleExpense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction purpose: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub purpose: TransactionPurpose,
    /// Set when funded from a bank account. Mutually exclusive with
    /// `cash_entry_id`.
    pub account_id: Option<Uuid>,
    /// The cash-ledger row backing this transaction, when funded from cash.
    pub cash_entry_id: Option<Uuid>,
    pub debit: Money,
    pub credit: Money,
    /// Id of the source row in expenses/payments/recoveries, per `purpose`.
    pub source_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl Transaction {
    pub fn new(
        purpose: TransactionPurpose,
        debit: Money,
        credit: Money,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if debit.is_negative() || credit.is_negative() {
            return Err(EngineError::Validation(
                "debit and credit must be >= 0".to_string(),
            ));
        }
        if !debit.is_zero() && !credit.is_zero() {
            return Err(EngineError::Validation(
                "exactly one of debit/credit may be nonzero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            purpose,
            account_id: None,
            cash_entry_id: None,
            debit,
            credit,
            source_id: None,
            trip_id: None,
            payment_mode: None,
            reference_no: None,
            note: None,
            occurred_at,
            created_at: Utc::now(),
            active: true,
        })
    }

    /// A transaction is funded by exactly one of a bank account or cash.
    pub(crate) fn validate_funding(&self) -> ResultEngine<()> {
        match (self.account_id.is_some(), self.cash_entry_id.is_some()) {
            (true, true) => Err(EngineError::Validation(
                "a transaction cannot be funded from both bank and cash".to_string(),
            )),
            (false, false) => Err(EngineError::Validation(
                "a transaction must be funded from a bank account or cash".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub purpose: String,
    pub account_id: Option<String>,
    pub cash_entry_id: Option<String>,
    pub debit: i64,
    pub credit: i64,
    pub source_id: Option<String>,
    pub trip_id: Option<String>,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            purpose: ActiveValue::Set(tx.purpose.as_str().to_string()),
            account_id: ActiveValue::Set(tx.account_id.map(|id| id.to_string())),
            cash_entry_id: ActiveValue::Set(tx.cash_entry_id.map(|id| id.to_string())),
            debit: ActiveValue::Set(tx.debit.minor()),
            credit: ActiveValue::Set(tx.credit.minor()),
            source_id: ActiveValue::Set(tx.source_id.map(|id| id.to_string())),
            trip_id: ActiveValue::Set(tx.trip_id.map(|id| id.to_string())),
            payment_mode: ActiveValue::Set(tx.payment_mode.clone()),
            reference_no: ActiveValue::Set(tx.reference_no.clone()),
            note: ActiveValue::Set(tx.note.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_at: ActiveValue::Set(tx.created_at),
            active: ActiveValue::Set(tx.active),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction".to_string()))?,
            purpose: TransactionPurpose::try_from(model.purpose.as_str())?,
            account_id: model.account_id.and_then(|s| Uuid::parse_str(&s).ok()),
            cash_entry_id: model.cash_entry_id.and_then(|s| Uuid::parse_str(&s).ok()),
            debit: Money::new(model.debit),
            credit: Money::new(model.credit),
            source_id: model.source_id.and_then(|s| Uuid::parse_str(&s).ok()),
            trip_id: model.trip_id.and_then(|s| Uuid::parse_str(&s).ok()),
            payment_mode: model.payment_mode,
            reference_no: model.reference_no,
            note: model.note,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
            active: model.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funding_must_be_exactly_one_of_bank_or_cash() {
        let mut tx = Transaction::new(
            TransactionPurpose::Expense,
            Money::new(100),
            Money::ZERO,
            Utc::now(),
        )
        .unwrap();
        assert!(tx.validate_funding().is_err());

        tx.account_id = Some(Uuid::new_v4());
        assert!(tx.validate_funding().is_ok());

        tx.cash_entry_id = Some(Uuid::new_v4());
        assert!(tx.validate_funding().is_err());
    }

    #[test]
    fn only_recoveries_are_incoming() {
        assert!(TransactionPurpose::Expense.is_outgoing());
        assert!(TransactionPurpose::PaymentToDepot.is_outgoing());
        assert!(TransactionPurpose::VehicleRent.is_outgoing());
        assert!(TransactionPurpose::VehicleExpense.is_outgoing());
        assert!(!TransactionPurpose::RecoveryFromClient.is_outgoing());
    }
}
