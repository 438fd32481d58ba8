use aide::axum::{routing::get_with, ApiRouter};
use axum::extract::State;
use macros::route;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{database, error::AppError, extract::Json, openapi::tag, AppState, Database};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Health {
	/// Always `ok` when the service can reach its database.
	pub status: String,
}

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/health", get_with(health, health_docs))
}

/// Health check
/// Reports whether the service is up and can complete a round-trip to its database.
#[route(tag = tag::HEALTH)]
pub async fn health(State(database): State<Database>) -> Result<Json<Health>, AppError> {
	database::ping(&database).await?;

	Ok(Json(Health {
		status: "ok".into(),
	}))
}
