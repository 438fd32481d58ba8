#![warn(clippy::pedantic)]

mod config;
mod database;
mod error;
mod extract;
mod openapi;
mod route;
mod signal;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::DefaultBodyLimit, http::HeaderName, Extension, Router};
use tower::{Layer, ServiceBuilder};
use tower_http::{
	catch_panic::CatchPanicLayer,
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use database::Database;

pub type AppState = State;

/// The shared application state.
///
/// Holds the connection pool, created once at startup and handed to every
/// handler through [`axum::extract::State`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Errors that abort the process before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("invalid configuration: {0}")]
	Config(#[from] config::ConfigError),
	#[error("failed to connect to the database: {0}")]
	Connect(#[source] sqlx::Error),
	#[error("failed to initialize the database schema: {0}")]
	Schema(#[source] sqlx::Error),
	#[error("failed to bind to {0}: {1}")]
	Bind(SocketAddr, #[source] std::io::Error),
	#[error("server error: {0}")]
	Serve(#[source] std::io::Error),
}

/// The largest request body accepted, in bytes. Note content has no length
/// limit of its own, so this is the effective bound on it.
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Builds the router with every route, the `OpenAPI` document and the
/// middleware stack.
fn routes(state: AppState) -> Router {
	let mut api = OpenApi::default();
	let request_id = HeaderName::from_static("x-request-id");

	ApiRouter::new()
		.merge(route::health::routes())
		.merge(route::note::routes())
		.nest_api_service(route::docs::ROOT, route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::new(request_id))
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new())
				.layer(CatchPanicLayer::custom(error::handle_panic)),
		)
		.with_state(state)
}

/// The complete application, as served.
///
/// Trailing slashes are trimmed before routing, which a layer on the router
/// itself cannot do, so the normalized router is mounted as the fallback of
/// an otherwise empty one.
pub fn app(state: AppState) -> Router {
	let normalized = NormalizePathLayer::trim_trailing_slash().layer(routes(state));

	Router::new().fallback_service(normalized)
}

async fn run(config: config::Config) -> Result<(), StartupError> {
	let database = database::connect(&config)
		.await
		.map_err(StartupError::Connect)?;

	database::init_schema(&database)
		.await
		.map_err(StartupError::Schema)?;

	let state = State {
		database: database.clone(),
	};

	let address = SocketAddr::new(config.host, config.port);
	let listener = tokio::net::TcpListener::bind(address)
		.await
		.map_err(|error| StartupError::Bind(address, error))?;

	tracing::info!(%address, "listening");

	axum::serve(listener, app(state))
		.with_graceful_shutdown(signal::shutdown())
		.await
		.map_err(StartupError::Serve)?;

	tracing::info!("waiting for database connections to close");
	database.close().await;

	Ok(())
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let guard = trace::init_tracing_subscriber();

	let result = match config::Config::from_env() {
		Ok(config) => run(config).await,
		Err(error) => Err(error.into()),
	};

	if let Err(error) = result {
		tracing::error!(%error, "shutting down");

		drop(guard);
		std::process::exit(1);
	}

	tracing::info!("shut down gracefully");
}
