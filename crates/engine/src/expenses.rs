//! Expense records, including vehicle rent and vehicle running costs.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    General,
    VehicleRent,
    VehicleExpense,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::VehicleRent => "vehicle_rent",
            Self::VehicleExpense => "vehicle_expense",
        }
    }
}

impl TryFrom<&str> for ExpenseKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "general" => Ok(Self::General),
            "vehicle_rent" => Ok(Self::VehicleRent),
            "vehicle_expense" => Ok(Self::VehicleExpense),
            other => Err(EngineError::Validation(format!(
                "invalid expense kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub kind: ExpenseKind,
    pub amount: Money,
    pub category: Option<String>,
    pub depot_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    pub vehicle_ref: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub active: bool,
}

impl Expense {
    pub fn new(kind: ExpenseKind, amount: Money, occurred_at: DateTime<Utc>) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "expense amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category: None,
            depot_id: None,
            trip_id: None,
            vehicle_ref: None,
            note: None,
            occurred_at,
            active: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount: i64,
    pub category: Option<String>,
    pub depot_id: Option<String>,
    pub trip_id: Option<String>,
    pub vehicle_ref: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            kind: ActiveValue::Set(expense.kind.as_str().to_string()),
            amount: ActiveValue::Set(expense.amount.minor()),
            category: ActiveValue::Set(expense.category.clone()),
            depot_id: ActiveValue::Set(expense.depot_id.map(|id| id.to_string())),
            trip_id: ActiveValue::Set(expense.trip_id.map(|id| id.to_string())),
            vehicle_ref: ActiveValue::Set(expense.vehicle_ref.clone()),
            note: ActiveValue::Set(expense.note.clone()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
            active: ActiveValue::Set(expense.active),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("expense".to_string()))?,
            kind: ExpenseKind::try_from(model.kind.as_str())?,
            amount: Money::new(model.amount),
            category: model.category,
            depot_id: model.depot_id.and_then(|s| Uuid::parse_str(&s).ok()),
            trip_id: model.trip_id.and_then(|s| Uuid::parse_str(&s).ok()),
            vehicle_ref: model.vehicle_ref,
            note: model.note,
            occurred_at: model.occurred_at,
            active: model.active,
        })
    }
}
