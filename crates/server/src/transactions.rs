//! Transaction API endpoints.

use api_types::Acknowledged;
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Reverses whichever movement (expense, payment, recovery) produced the
/// transaction.
pub async fn remove(
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.reverse_transaction(transaction_id).await?;

    Ok(Json(Acknowledged {
        message: "transaction reversed".to_string(),
    }))
}
