//! Ledger primitives.
//!
//! A `LedgerEntry` is one mutation of a running-balance ledger. Three
//! parallel ledgers share the same row shape, keyed by [`LedgerKind`] and an
//! owner id: one per bank account, the single shared cash-in-hand ledger, and
//! one pool per depot.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Owner id of the single shared cash-in-hand ledger.
pub const CASH_OWNER_ID: &str = "cash";

/// Which of the three parallel ledgers a row belongs to.
///
/// The sign convention is **not uniform** across kinds and is kept as two
/// explicit strategies rather than unified, to avoid silently inverting
/// historical data semantics:
/// - `Bank` / `Cash`: credit increases the balance, debit decreases it.
/// - `Pool`: debit increases the balance, credit decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Bank,
    Cash,
    Pool,
}

impl LedgerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Pool => "pool",
        }
    }

    /// Signed balance delta of an entry under this ledger's sign convention.
    #[must_use]
    pub fn signed_delta(self, debit: Money, credit: Money) -> Money {
        match self {
            Self::Bank | Self::Cash => credit - debit,
            Self::Pool => debit - credit,
        }
    }
}

impl TryFrom<&str> for LedgerKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bank" => Ok(Self::Bank),
            "cash" => Ok(Self::Cash),
            "pool" => Ok(Self::Pool),
            other => Err(EngineError::Validation(format!(
                "invalid ledger kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: LedgerKind,
    /// Account id for `Bank`, [`CASH_OWNER_ID`] for `Cash`, depot id for
    /// `Pool`.
    pub owner_id: String,
    pub debit: Money,
    pub credit: Money,
    /// Balance *after* this entry is applied, given the ledger's
    /// chronological order `(occurred_at, id)`.
    pub running_balance: Money,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub transaction_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub recovery_id: Option<Uuid>,
    pub note: Option<String>,
}

impl LedgerEntry {
    /// Builds an entry without a running balance yet (the ledger op fills it
    /// in at append time).
    ///
    /// Validates:
    /// - `debit >= 0` and `credit >= 0`
    /// - at most one of debit/credit is nonzero (both zero is allowed for
    ///   zero-delta seed/opening rows)
    /// - at most one of the payment/recovery tags is set
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: LedgerKind,
        owner_id: String,
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
            kind,
            owner_id,
            debit,
            credit,
            running_balance: Money::ZERO,
            occurred_at,
            created_at: Utc::now(),
            active: true,
            transaction_id: None,
            trip_id: None,
            payment_id: None,
            recovery_id: None,
            note: None,
        })
    }

    /// Signed delta of this entry under its ledger's sign convention.
    #[must_use]
    pub fn signed_delta(&self) -> Money {
        self.kind.signed_delta(self.debit, self.credit)
    }

    /// An entry belongs to at most one source row; `trip_id` is plain
    /// linkage and may accompany either tag.
    pub(crate) fn validate_tags(&self) -> ResultEngine<()> {
        if self.payment_id.is_some() && self.recovery_id.is_some() {
            return Err(EngineError::Validation(
                "a ledger entry may carry at most one of payment/recovery".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub owner_id: String,
    pub debit: i64,
    pub credit: i64,
    pub running_balance: i64,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub active: bool,
    pub transaction_id: Option<String>,
    pub trip_id: Option<String>,
    pub payment_id: Option<String>,
    pub recovery_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            owner_id: ActiveValue::Set(entry.owner_id.clone()),
            debit: ActiveValue::Set(entry.debit.minor()),
            credit: ActiveValue::Set(entry.credit.minor()),
            running_balance: ActiveValue::Set(entry.running_balance.minor()),
            occurred_at: ActiveValue::Set(entry.occurred_at),
            created_at: ActiveValue::Set(entry.created_at),
            active: ActiveValue::Set(entry.active),
            transaction_id: ActiveValue::Set(entry.transaction_id.map(|id| id.to_string())),
            trip_id: ActiveValue::Set(entry.trip_id.map(|id| id.to_string())),
            payment_id: ActiveValue::Set(entry.payment_id.map(|id| id.to_string())),
            recovery_id: ActiveValue::Set(entry.recovery_id.map(|id| id.to_string())),
            note: ActiveValue::Set(entry.note.clone()),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("ledger entry".to_string()))?,
            kind: LedgerKind::try_from(model.kind.as_str())?,
            owner_id: model.owner_id,
            debit: Money::new(model.debit),
            credit: Money::new(model.credit),
            running_balance: Money::new(model.running_balance),
            occurred_at: model.occurred_at,
            created_at: model.created_at,
            active: model.active,
            transaction_id: model.transaction_id.and_then(|s| Uuid::parse_str(&s).ok()),
            trip_id: model.trip_id.and_then(|s| Uuid::parse_str(&s).ok()),
            payment_id: model.payment_id.and_then(|s| Uuid::parse_str(&s).ok()),
            recovery_id: model.recovery_id.and_then(|s| Uuid::parse_str(&s).ok()),
            note: model.note,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_and_cash_credit_increases_balance() {
        for kind in [LedgerKind::Bank, LedgerKind::Cash] {
            assert_eq!(
                kind.signed_delta(Money::ZERO, Money::new(500)),
                Money::new(500)
            );
            assert_eq!(
                kind.signed_delta(Money::new(200), Money::ZERO),
                Money::new(-200)
            );
        }
    }

    #[test]
    fn pool_debit_increases_balance() {
        assert_eq!(
            LedgerKind::Pool.signed_delta(Money::new(300), Money::ZERO),
            Money::new(300)
        );
        assert_eq!(
            LedgerKind::Pool.signed_delta(Money::ZERO, Money::new(100)),
            Money::new(-100)
        );
    }

    #[test]
    fn rejects_debit_and_credit_both_nonzero() {
        let err = LedgerEntry::new(
            LedgerKind::Bank,
            "acc".to_string(),
            Money::new(1),
            Money::new(1),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("exactly one of debit/credit may be nonzero".to_string())
        );
    }

    #[test]
    fn allows_zero_delta_opening_rows() {
        let entry = LedgerEntry::new(
            LedgerKind::Cash,
            CASH_OWNER_ID.to_string(),
            Money::ZERO,
            Money::ZERO,
            Utc::now(),
        )
        .unwrap();
        assert!(entry.signed_delta().is_zero());
    }

    #[test]
    fn rejects_multiple_tags() {
        let mut entry = LedgerEntry::new(
            LedgerKind::Pool,
            "depot".to_string(),
            Money::new(100),
            Money::ZERO,
            Utc::now(),
        )
        .unwrap();
        entry.payment_id = Some(Uuid::new_v4());
        entry.recovery_id = Some(Uuid::new_v4());
        assert!(entry.validate_tags().is_err());
    }
}
