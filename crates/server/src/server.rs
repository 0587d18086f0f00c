use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{accounts, cash, depots, expenses, payments, recoveries, transactions, trips};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/accounts", post(accounts::account_new).get(accounts::list))
        .route("/accounts/{id}/ledger", get(accounts::ledger))
        .route("/depots", post(depots::depot_new).get(depots::list))
        .route("/depots/{id}/ledger", get(depots::ledger))
        .route("/depots/{id}/receivables", get(depots::receivables))
        .route("/cash/ledger", get(cash::ledger))
        .route("/trips", post(trips::trip_new).get(trips::list))
        .route("/trips/{id}", get(trips::get))
        .route("/trips/{id}/depots", post(trips::trip_depot_new))
        .route("/trips/{id}/clients", post(trips::client_trip_new))
        .route("/trips/{id}/fuelSold", post(trips::fuel_sold))
        .route("/expenses", post(expenses::expense_new))
        .route("/expenses/{id}", axum::routing::delete(expenses::remove))
        .route("/vehicleRent", post(expenses::vehicle_rent_new))
        .route("/vehicleExpense", post(expenses::vehicle_expense_new))
        .route("/payments", post(payments::payment_new))
        .route("/payments/{id}", axum::routing::delete(payments::remove))
        .route("/recoveries", post(recoveries::recovery_new))
        .route("/recoveries/{id}", axum::routing::delete(recoveries::remove))
        .route(
            "/transactions/{id}",
            axum::routing::delete(transactions::remove),
        )
        .route("/recalculate", post(cash::recalculate_all))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn account_create_then_list_round_trips() {
        let app = test_router().await;

        let created = app
            .clone()
            .oneshot(post_json(
                "/accounts",
                json!({ "name": "HBL", "opening_balance": 50_000 }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = json_body(created).await;
        let account_id = created["id"].as_str().unwrap().to_string();

        let listed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/accounts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let listed = json_body(listed).await;
        assert_eq!(listed[0]["id"], account_id.as_str());
        assert_eq!(listed[0]["balance"], 50_000);

        let ledger = app
            .oneshot(
                Request::builder()
                    .uri(format!("/accounts/{account_id}/ledger"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ledger.status(), StatusCode::OK);
        let ledger = json_body(ledger).await;
        assert_eq!(ledger["balance"], 50_000);
        assert_eq!(ledger["entries"][0]["note"], "Opening Balance");
    }

    #[tokio::test]
    async fn unknown_depot_ledger_is_404_with_failure_body() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/depots/{}/ledger", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["message"], "request failed");
        assert_eq!(body["error"], "\"depot\" not found!");
    }

    #[tokio::test]
    async fn overdrawing_cash_is_rejected_with_400() {
        let app = test_router().await;

        let response = app
            .oneshot(post_json(
                "/expenses",
                json!({
                    "funding": { "kind": "cash" },
                    "amount": 10_000,
                    "category": "toll"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "request failed");
    }
}
