pub mod accounts;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/accounts/signup", post(accounts::signup))
        .route("/api/v1/accounts/login", post(accounts::login))
        .route("/api/v1/accounts", get(accounts::list))
        .route("/api/v1/accounts/{id}", get(accounts::get_by_id))
}
